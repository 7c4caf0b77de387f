use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Delivery(#[from] msg_sender::Error),

    #[error("failed to read site file {}: {source}", .path.display())]
    ReadSite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse site file {}: {source}", .path.display())]
    ParseSite {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid site file {}: {message}", .path.display())]
    InvalidSite { path: PathBuf, message: String },

    #[error("logging setup failed: {0}")]
    Logging(String),
}
