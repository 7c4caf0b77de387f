//! Channel settings.
//!
//! Settings arrive as a JSON object and are validated for presence only:
//! every required key must exist and be non-null. Values are not type-checked
//! here, so a bad hostname or port surfaces when the channel connects.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Delivery channel selector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ChannelKind {
    /// SMTP over TLS.
    #[strum(to_string = "email", serialize = "mail")]
    #[cfg_attr(feature = "clap", value(alias = "mail"))]
    Email,
    /// Telegram Bot API.
    #[strum(to_string = "telegram", serialize = "chat")]
    #[cfg_attr(feature = "clap", value(alias = "chat"))]
    Telegram,
}

/// SMTP settings.
#[derive(Clone, PartialEq)]
pub struct EmailSettings {
    /// Site name shown in the subject and header line.
    pub website_name: String,
    /// Recipient address.
    pub mailto: String,
    /// SMTP username, also used as the envelope sender.
    pub username: String,
    pub password: String,
    pub hostname: String,
    /// Port exactly as configured (number or string).
    pub port: Value,
}

impl EmailSettings {
    pub const REQUIRED_FIELDS: [&'static str; 6] = [
        "website_name",
        "mailto",
        "username",
        "password",
        "hostname",
        "port",
    ];

    /// Parse settings from a raw JSON string.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Self::from_object(&parse_object(raw)?)
    }

    /// Build settings from an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        Self::from_object(&into_object(value)?)
    }

    fn from_object(object: &Map<String, Value>) -> Result<Self, ConfigError> {
        check_required(object, &Self::REQUIRED_FIELDS)?;
        Ok(Self {
            website_name: required_text(object, "website_name")?,
            mailto: required_text(object, "mailto")?,
            username: required_text(object, "username")?,
            password: required_text(object, "password")?,
            hostname: required_text(object, "hostname")?,
            port: required(object, "port")?.clone(),
        })
    }

    /// The port as a TCP port number, if it is one.
    pub fn port_number(&self) -> Option<u16> {
        match &self.port {
            Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailSettings")
            .field("website_name", &self.website_name)
            .field("mailto", &self.mailto)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .finish()
    }
}

/// Telegram Bot API settings.
#[derive(Clone, PartialEq)]
pub struct TelegramSettings {
    /// Site name shown in the header line.
    pub website_name: String,
    /// Target chat, forwarded verbatim (numeric id or `@channel` name).
    pub chat_id: Value,
    pub bot_token: String,
}

impl TelegramSettings {
    pub const REQUIRED_FIELDS: [&'static str; 3] = ["website_name", "chat_id", "bot_token"];

    /// Parse settings from a raw JSON string.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Self::from_object(&parse_object(raw)?)
    }

    /// Build settings from an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        Self::from_object(&into_object(value)?)
    }

    fn from_object(object: &Map<String, Value>) -> Result<Self, ConfigError> {
        check_required(object, &Self::REQUIRED_FIELDS)?;
        Ok(Self {
            website_name: required_text(object, "website_name")?,
            chat_id: required(object, "chat_id")?.clone(),
            bot_token: required_text(object, "bot_token")?,
        })
    }
}

impl fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("website_name", &self.website_name)
            .field("chat_id", &self.chat_id)
            .field("bot_token", &"<redacted>")
            .finish()
    }
}

/// Validated settings for one channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Settings {
    Email(EmailSettings),
    Telegram(TelegramSettings),
}

impl Settings {
    /// Parse the raw configuration blob for `kind`.
    pub fn parse(kind: ChannelKind, raw: &str) -> Result<Self, ConfigError> {
        match kind {
            ChannelKind::Email => EmailSettings::parse(raw).map(Self::Email),
            ChannelKind::Telegram => TelegramSettings::parse(raw).map(Self::Telegram),
        }
    }

    /// Build settings for `kind` from an already-decoded JSON value.
    pub fn from_value(kind: ChannelKind, value: Value) -> Result<Self, ConfigError> {
        match kind {
            ChannelKind::Email => EmailSettings::from_value(value).map(Self::Email),
            ChannelKind::Telegram => TelegramSettings::from_value(value).map(Self::Telegram),
        }
    }

    pub fn kind(&self) -> ChannelKind {
        match self {
            Self::Email(_) => ChannelKind::Email,
            Self::Telegram(_) => ChannelKind::Telegram,
        }
    }

    pub fn website_name(&self) -> &str {
        match self {
            Self::Email(s) => &s.website_name,
            Self::Telegram(s) => &s.website_name,
        }
    }
}

/// Decode `raw` as a JSON object.
pub(crate) fn parse_object(raw: &str) -> Result<Map<String, Value>, ConfigError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ConfigError::MalformedInput(e.to_string()))?;
    into_object(value)
}

pub(crate) fn into_object(value: Value) -> Result<Map<String, Value>, ConfigError> {
    match value {
        Value::Object(object) => Ok(object),
        other => Err(ConfigError::MalformedInput(format!(
            "expected a JSON object, found {}",
            json_type_name(&other)
        ))),
    }
}

/// Fail on the first absent key, in declaration order.
pub(crate) fn check_required(
    object: &Map<String, Value>,
    fields: &[&str],
) -> Result<(), ConfigError> {
    fields
        .iter()
        .try_for_each(|field| required(object, field).map(|_| ()))
}

pub(crate) fn required<'a>(
    object: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a Value, ConfigError> {
    match object.get(key) {
        None | Some(Value::Null) => Err(ConfigError::MissingField(key.to_string())),
        Some(value) => Ok(value),
    }
}

/// Strings are taken as-is; other values use their JSON text.
pub(crate) fn required_text(object: &Map<String, Value>, key: &str) -> Result<String, ConfigError> {
    Ok(match required(object, key)? {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    const EMAIL_CONFIG: &str = r#"{"website_name":"A","mailto":"x@x","username":"u","password":"p","hostname":"h","port":587}"#;

    #[test]
    fn test_email_settings_verbatim() {
        let settings = EmailSettings::parse(EMAIL_CONFIG).unwrap();
        assert_eq!(settings.website_name, "A");
        assert_eq!(settings.mailto, "x@x");
        assert_eq!(settings.username, "u");
        assert_eq!(settings.password, "p");
        assert_eq!(settings.hostname, "h");
        assert_eq!(settings.port, json!(587));
        assert_eq!(settings.port_number(), Some(587));
    }

    #[rstest]
    #[case("website_name")]
    #[case("mailto")]
    #[case("username")]
    #[case("password")]
    #[case("hostname")]
    #[case("port")]
    fn test_email_settings_missing_field(#[case] field: &str) {
        let mut value: Value = serde_json::from_str(EMAIL_CONFIG).unwrap();
        value.as_object_mut().unwrap().remove(field);

        let err = EmailSettings::from_value(value).unwrap_err();
        assert_eq!(err, ConfigError::MissingField(field.to_string()));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let raw = r#"{"website_name":"A","chat_id":null,"bot_token":"t"}"#;
        let err = TelegramSettings::parse(raw).unwrap_err();
        assert_eq!(err, ConfigError::MissingField("chat_id".to_string()));
    }

    #[test]
    fn test_first_missing_field_is_reported() {
        let err = EmailSettings::parse(r#"{"website_name":"A"}"#).unwrap_err();
        assert_eq!(err, ConfigError::MissingField("mailto".to_string()));
    }

    #[rstest]
    #[case("not json at all")]
    #[case("{\"website_name\": ")]
    #[case("")]
    #[case("[1, 2, 3]")]
    #[case("\"a string\"")]
    fn test_malformed_input(#[case] raw: &str) {
        let err = Settings::parse(ChannelKind::Telegram, raw).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedInput(_)), "{err:?}");
    }

    #[test]
    fn test_types_are_not_validated() {
        let raw = r#"{"website_name":42,"mailto":"x","username":"u","password":"p","hostname":"not a host","port":"smtp"}"#;
        let settings = EmailSettings::parse(raw).unwrap();
        assert_eq!(settings.website_name, "42");
        assert_eq!(settings.hostname, "not a host");
        assert_eq!(settings.port, json!("smtp"));
        assert_eq!(settings.port_number(), None);
    }

    #[rstest]
    #[case(json!(465), Some(465))]
    #[case(json!("2525"), Some(2525))]
    #[case(json!(" 587 "), Some(587))]
    #[case(json!(70000), None)]
    #[case(json!(-1), None)]
    #[case(json!(true), None)]
    fn test_port_number(#[case] port: Value, #[case] expected: Option<u16>) {
        let settings = EmailSettings {
            website_name: "A".to_string(),
            mailto: "x@x".to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
            hostname: "h".to_string(),
            port,
        };
        assert_eq!(settings.port_number(), expected);
    }

    #[test]
    fn test_telegram_chat_id_kept_verbatim() {
        let numeric =
            TelegramSettings::parse(r#"{"website_name":"A","chat_id":-100123,"bot_token":"t"}"#)
                .unwrap();
        assert_eq!(numeric.chat_id, json!(-100123));

        let named =
            TelegramSettings::parse(r#"{"website_name":"A","chat_id":"@site","bot_token":"t"}"#)
                .unwrap();
        assert_eq!(named.chat_id, json!("@site"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = EmailSettings::parse(EMAIL_CONFIG).unwrap();
        let rendered = format!("{settings:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("\"p\""));

        let telegram = TelegramSettings::parse(
            r#"{"website_name":"A","chat_id":1,"bot_token":"123:SECRET"}"#,
        )
        .unwrap();
        assert!(!format!("{telegram:?}").contains("SECRET"));
    }

    #[rstest]
    #[case("email", ChannelKind::Email)]
    #[case("mail", ChannelKind::Email)]
    #[case("EMAIL", ChannelKind::Email)]
    #[case("telegram", ChannelKind::Telegram)]
    #[case("chat", ChannelKind::Telegram)]
    fn test_channel_kind_from_str(#[case] input: &str, #[case] expected: ChannelKind) {
        assert_eq!(input.parse::<ChannelKind>().unwrap(), expected);
    }

    #[test]
    fn test_channel_kind_display() {
        assert_eq!(ChannelKind::Email.to_string(), "email");
        assert_eq!(ChannelKind::Telegram.to_string(), "telegram");
        assert!("sms".parse::<ChannelKind>().is_err());
    }

    #[test]
    fn test_settings_dispatch_by_kind() {
        let settings = Settings::parse(ChannelKind::Email, EMAIL_CONFIG).unwrap();
        assert_eq!(settings.kind(), ChannelKind::Email);
        assert_eq!(settings.website_name(), "A");

        let err = Settings::parse(ChannelKind::Telegram, EMAIL_CONFIG).unwrap_err();
        assert_eq!(err, ConfigError::MissingField("chat_id".to_string()));
    }
}
