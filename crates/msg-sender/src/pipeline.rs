//! End-to-end delivery of one notification.

use tracing::{debug, info, warn};

use crate::channels::{DispatchOptions, NotificationChannel};
use crate::config::{ChannelKind, Settings};
use crate::error::Result;
use crate::message::NotificationMessage;
use crate::sanitize::looks_like_mail;

/// Validate, compose and send one notification.
///
/// Configuration and message errors are returned before any connection is
/// opened. The channel then gets exactly one attempt.
pub async fn deliver(
    kind: ChannelKind,
    raw_config: &str,
    raw_message: &str,
    options: &DispatchOptions,
) -> Result<()> {
    let settings = Settings::parse(kind, raw_config)?;
    let message = NotificationMessage::parse(raw_message)?;
    deliver_parsed(settings, message, options).await
}

/// [`deliver`] for input that is already decoded.
pub async fn deliver_parsed(
    settings: Settings,
    message: NotificationMessage,
    options: &DispatchOptions,
) -> Result<()> {
    let message = message.sanitized();
    if !looks_like_mail(&message.mail) {
        warn!(
            reply_address = %message.mail,
            "Reply address does not look like an email address; delivering anyway"
        );
    }

    let channel = settings.into_channel(options);
    dispatch(channel.as_ref(), &message).await
}

/// Send `message` over `channel` and log the outcome.
///
/// A failure is logged at `debug` and returned, so it is reported once by
/// whoever handles the error.
pub async fn dispatch(
    channel: &dyn NotificationChannel,
    message: &NotificationMessage,
) -> Result<()> {
    let channel_type = channel.channel_type();
    debug!(channel = channel_type, "Sending notification");

    match channel.send(message).await {
        Ok(()) => {
            info!(channel = channel_type, "Notification delivered");
            Ok(())
        }
        Err(e) => {
            debug!(
                channel = channel_type,
                remote_rejection = e.is_remote_rejection(),
                error = %e,
                "Notification delivery failed"
            );
            Err(e.into())
        }
    }
}
