//! The contact-form submission being delivered.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{check_required, into_object, parse_object, required_text};
use crate::error::ConfigError;
use crate::sanitize::{strip_unprintable_body, strip_unprintable_name};

/// A contact-form submission. Every field is untrusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Sender display name.
    pub name: String,
    /// Sender reply address.
    pub mail: String,
    /// Free-text body.
    pub msg: String,
}

impl NotificationMessage {
    pub const REQUIRED_FIELDS: [&'static str; 3] = ["name", "mail", "msg"];

    pub fn new(name: impl Into<String>, mail: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mail: mail.into(),
            msg: msg.into(),
        }
    }

    /// Parse a message from a raw JSON string.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Self::from_object(&parse_object(raw)?)
    }

    /// Build a message from an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        Self::from_object(&into_object(value)?)
    }

    fn from_object(object: &Map<String, Value>) -> Result<Self, ConfigError> {
        check_required(object, &Self::REQUIRED_FIELDS)?;
        Ok(Self {
            name: required_text(object, "name")?,
            mail: required_text(object, "mail")?,
            msg: required_text(object, "msg")?,
        })
    }

    /// Drop invisible and unprintable characters. The name and address lose
    /// control characters too; the body keeps its line breaks.
    pub fn sanitized(self) -> Self {
        Self {
            name: strip_unprintable_name(&self.name),
            mail: strip_unprintable_name(&self.mail),
            msg: strip_unprintable_body(&self.msg),
        }
    }
}
