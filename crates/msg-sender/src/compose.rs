//! Channel-specific rendering of a notification.
//!
//! Both channels share one layout: a `Message from <site>` header, a blank
//! line, then the bold-labelled `Name`, `Email` and `Message` fields. Only the
//! line break differs. Every interpolated value goes through
//! [`escape_html`] first.

use serde::Serialize;
use serde_json::Value;

use crate::config::{EmailSettings, Settings, TelegramSettings};
use crate::message::NotificationMessage;
use crate::sanitize::escape_html;

/// Telegram `parse_mode` selecting its HTML subset.
pub const PARSE_MODE_HTML: &str = "HTML";

/// Rendered email: subject line and HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailPayload {
    pub subject: String,
    pub html: String,
}

/// Body of a Telegram `sendMessage` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelegramPayload {
    pub chat_id: Value,
    pub text: String,
    pub parse_mode: String,
    pub disable_web_page_preview: bool,
}

/// A notification ready for transport.
#[derive(Debug, Clone, PartialEq)]
pub enum ComposedPayload {
    Email(EmailPayload),
    Telegram(TelegramPayload),
}

impl Settings {
    /// Render `message` for this channel.
    pub fn compose(&self, message: &NotificationMessage) -> ComposedPayload {
        match self {
            Self::Email(settings) => ComposedPayload::Email(compose_email(settings, message)),
            Self::Telegram(settings) => {
                ComposedPayload::Telegram(compose_telegram(settings, message))
            }
        }
    }
}

/// Site name and message fields after escaping.
struct EscapedFields {
    site: String,
    name: String,
    mail: String,
    body: String,
}

impl EscapedFields {
    fn new(website_name: &str, message: &NotificationMessage) -> Self {
        Self {
            site: escape_html(website_name),
            name: escape_html(&message.name),
            mail: escape_html(&message.mail),
            body: escape_html(&message.msg),
        }
    }

    fn render(&self, line_break: &str) -> String {
        let Self {
            site,
            name,
            mail,
            body,
        } = self;
        format!(
            "Message from {site}{line_break}{line_break}\
             <b>Name:</b> {name}{line_break}\
             <b>Email:</b> {mail}{line_break}\
             <b>Message:</b> {body}"
        )
    }
}

/// Subject line for the email channel.
pub fn email_subject(website_name: &str) -> String {
    format!("Message from {website_name}")
}

/// Render the HTML email.
///
/// Only the first newline of the body becomes `<br>`; any later ones are
/// left as they are.
pub fn compose_email(settings: &EmailSettings, message: &NotificationMessage) -> EmailPayload {
    let mut fields = EscapedFields::new(&settings.website_name, message);
    fields.body = fields.body.replacen('\n', "<br>", 1);

    EmailPayload {
        subject: email_subject(&settings.website_name),
        html: format!("<html><body>{}</body></html>", fields.render("<br>")),
    }
}

/// Render the Telegram request body. Body newlines are kept as-is.
pub fn compose_telegram(
    settings: &TelegramSettings,
    message: &NotificationMessage,
) -> TelegramPayload {
    let fields = EscapedFields::new(&settings.website_name, message);

    TelegramPayload {
        chat_id: settings.chat_id.clone(),
        text: fields.render("\n"),
        parse_mode: PARSE_MODE_HTML.to_string(),
        disable_web_page_preview: true,
    }
}
