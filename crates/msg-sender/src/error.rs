//! Error types for the notification pipeline.

use thiserror::Error;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating configuration or message input.
///
/// These are fatal and always surface before any network activity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The raw blob is not a JSON object.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A required key is absent or `null`.
    #[error("missing required field `{0}`")]
    MissingField(String),
}

/// Errors raised by a single delivery attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The network or protocol layer could not complete the exchange.
    #[error("request failed: {0}")]
    ConnectionFailure(String),

    /// The exchange completed but the remote service refused the message.
    #[error("server returned error: {0}")]
    RemoteRejection(String),

    /// The outbound request could not be built from the settings, so nothing
    /// was dialed (unparseable port or mailbox, unencodable body).
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),
}

impl TransportError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionFailure(msg.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::RemoteRejection(msg.into())
    }

    pub fn invalid_envelope(msg: impl Into<String>) -> Self {
        Self::InvalidEnvelope(msg.into())
    }

    /// Whether the remote service answered and refused the message.
    pub fn is_remote_rejection(&self) -> bool {
        matches!(self, Self::RemoteRejection(_))
    }
}

/// Umbrella error for [`crate::pipeline::deliver`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("delivery error: {0}")]
    Transport(#[from] TransportError),
}

/// Render an error together with its `source()` chain.
///
/// Library errors such as `reqwest::Error` keep the interesting part
/// (refused connection, DNS failure) in their sources.
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !rendered.contains(&cause_text) {
            rendered.push_str(": ");
            rendered.push_str(&cause_text);
        }
        source = cause.source();
    }
    rendered
}
