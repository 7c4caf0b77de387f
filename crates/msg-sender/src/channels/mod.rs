//! Notification channels.
//!
//! This module provides the transports a notification can be delivered over:
//! - Email (SMTP with implicit TLS)
//! - Telegram Bot API
//!
//! Each [`NotificationChannel::send`] makes exactly one attempt. Failures are
//! returned to the caller and never retried.

mod email;
mod telegram;

pub use email::{EmailChannel, EmailTransport, SmtpTransport};
pub use telegram::{TELEGRAM_API_BASE, TelegramChannel};

use std::time::Duration;

use async_trait::async_trait;

use crate::config::Settings;
use crate::error::TransportError;
use crate::message::NotificationMessage;

/// Default bound on a single delivery attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for notification channels.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Get the channel type name.
    fn channel_type(&self) -> &'static str;

    /// Compose and deliver `message`, once.
    async fn send(&self, message: &NotificationMessage) -> Result<(), TransportError>;
}

/// Knobs applied when a channel is built from [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Upper bound on the transport call. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Telegram Bot API base URL.
    pub telegram_api_base: String,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            telegram_api_base: TELEGRAM_API_BASE.to_string(),
        }
    }
}

impl DispatchOptions {
    /// Options with `timeout`; zero disables the bound.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: (!timeout.is_zero()).then_some(timeout),
            ..Self::default()
        }
    }
}

impl Settings {
    /// Build the channel these settings describe.
    pub fn into_channel(self, options: &DispatchOptions) -> Box<dyn NotificationChannel> {
        match self {
            Self::Email(settings) => Box::new(EmailChannel::new(settings, options.timeout)),
            Self::Telegram(settings) => Box::new(
                TelegramChannel::new(settings, options.timeout)
                    .with_api_base(options.telegram_api_base.clone()),
            ),
        }
    }
}
