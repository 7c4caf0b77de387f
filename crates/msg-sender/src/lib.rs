//! Contact-form notification delivery.
//!
//! A submission (sender name, reply address, body) is validated, escaped,
//! rendered for its channel and sent once over SMTP or the Telegram Bot API.
//!
//! # Example
//!
//! ```ignore
//! use msg_sender::{ChannelKind, DispatchOptions, deliver};
//!
//! deliver(
//!     ChannelKind::Telegram,
//!     r#"{"website_name":"Acme","chat_id":42,"bot_token":"123:ABC"}"#,
//!     r#"{"name":"Bob","mail":"b@b.com","msg":"hi"}"#,
//!     &DispatchOptions::default(),
//! )
//! .await?;
//! ```

pub mod channels;
pub mod compose;
pub mod config;
pub mod error;
pub mod http_client;
pub mod message;
pub mod pipeline;
pub mod sanitize;

pub use channels::{DispatchOptions, EmailChannel, NotificationChannel, TelegramChannel};
pub use compose::{ComposedPayload, EmailPayload, TelegramPayload};
pub use config::{ChannelKind, EmailSettings, Settings, TelegramSettings};
pub use error::{ConfigError, Error, Result, TransportError};
pub use message::NotificationMessage;
pub use pipeline::{deliver, deliver_parsed, dispatch};
pub use sanitize::escape_html;
