//! Telegram Bot API notification channel.
//!
//! Sends one message via the Telegram Bot API (`POST /bot<token>/sendMessage`).
//! A request that never completes and a response with `"ok": false` are
//! reported as different errors. Neither is retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde::Deserialize;
use tracing::{debug, info};

use super::NotificationChannel;
use crate::compose::{TelegramPayload, compose_telegram};
use crate::config::TelegramSettings;
use crate::error::{TransportError, error_chain};
use crate::http_client::build_client;
use crate::message::NotificationMessage;

/// Public Telegram Bot API endpoint.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// The parts of a Bot API reply we look at.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error_message: Option<String>,
    /// Field the Bot API actually uses for the error text.
    #[serde(default)]
    description: Option<String>,
}

/// Telegram notification channel.
pub struct TelegramChannel {
    settings: TelegramSettings,
    client: Client,
    api_base: String,
}

impl TelegramChannel {
    /// Create a new Telegram channel.
    pub fn new(settings: TelegramSettings, timeout: Option<Duration>) -> Self {
        Self {
            settings,
            client: build_client(timeout),
            api_base: TELEGRAM_API_BASE.to_string(),
        }
    }

    /// Point the channel at another Bot API server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.settings.bot_token
        )
    }

    /// POST the payload once and interpret the reply.
    async fn post(&self, payload: &TelegramPayload) -> Result<(), TransportError> {
        let body = serde_json::to_vec(payload).map_err(|e| {
            TransportError::invalid_envelope(format!("failed to encode payload: {e}"))
        })?;

        // Errors carry the URL, and the URL carries the bot token.
        let response = self
            .client
            .post(self.endpoint())
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, body.len())
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::connection(error_chain(&e.without_url())))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            TransportError::connection(format!(
                "failed to read response: {}",
                error_chain(&e.without_url())
            ))
        })?;

        let reply: ApiResponse = serde_json::from_slice(&bytes).map_err(|e| {
            TransportError::connection(format!("unreadable response (HTTP {status}): {e}"))
        })?;

        if reply.ok {
            return Ok(());
        }

        let reason = reply
            .error_message
            .or(reply.description)
            .unwrap_or_else(|| format!("HTTP {status}"));
        Err(TransportError::rejected(reason))
    }
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    fn channel_type(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, message: &NotificationMessage) -> Result<(), TransportError> {
        let payload = compose_telegram(&self.settings, message);

        debug!(
            chat_id = %self.settings.chat_id,
            site = %self.settings.website_name,
            "Posting Telegram notification"
        );
        self.post(&payload).await?;

        info!(site = %self.settings.website_name, "Telegram notification delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings() -> TelegramSettings {
        TelegramSettings {
            website_name: "Acme".to_string(),
            chat_id: json!(42),
            bot_token: "123:ABC".to_string(),
        }
    }

    #[test]
    fn test_endpoint() {
        let channel = TelegramChannel::new(settings(), None);
        assert_eq!(
            channel.endpoint(),
            "https://api.telegram.org/bot123:ABC/sendMessage"
        );

        let channel = channel.with_api_base("http://127.0.0.1:8081/");
        assert_eq!(
            channel.endpoint(),
            "http://127.0.0.1:8081/bot123:ABC/sendMessage"
        );
    }

    #[test]
    fn test_api_response_fields() {
        let reply: ApiResponse =
            serde_json::from_str(r#"{"ok":false,"error_code":400,"description":"Bad Request"}"#)
                .unwrap();
        assert!(!reply.ok);
        assert_eq!(reply.description.as_deref(), Some("Bad Request"));
        assert!(reply.error_message.is_none());

        let reply: ApiResponse = serde_json::from_str(r#"{"ok":true,"result":{}}"#).unwrap();
        assert!(reply.ok);
    }

    #[tokio::test]
    async fn test_connection_refused_hides_token() {
        let channel = TelegramChannel::new(settings(), Some(Duration::from_secs(5)))
            .with_api_base("http://127.0.0.1:1");

        let err = channel
            .send(&NotificationMessage::new("Bob", "b@b.com", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::ConnectionFailure(_)), "{err:?}");
        assert!(!err.to_string().contains("123:ABC"));
    }

    #[test]
    fn test_channel_type() {
        assert_eq!(TelegramChannel::new(settings(), None).channel_type(), "telegram");
    }
}
