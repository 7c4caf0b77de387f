//! Per-site TOML files.
//!
//! ```toml
//! id = "acme"
//! sender_type = "telegram"
//!
//! [sender]
//! website_name = "Acme"
//! chat_id = 42
//! bot_token = "123:ABC"
//! ```
//!
//! The `[sender]` table becomes the channel's JSON configuration. When it has
//! no `website_name`, the site `id` is used.

use std::path::Path;

use msg_sender::ChannelKind;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
struct SiteFile {
    #[serde(default)]
    id: Option<String>,
    sender_type: String,
    sender: toml::Table,
}

/// A loaded site: which channel to use and its configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: Option<String>,
    pub kind: ChannelKind,
    pub config: Value,
}

/// Read and parse the site file at `path`.
pub fn load_site(path: &Path) -> Result<Site> {
    let contents = std::fs::read_to_string(path).map_err(|source| AppError::ReadSite {
        path: path.to_path_buf(),
        source,
    })?;
    parse_site(path, &contents)
}

/// Parse site file `contents`; `path` is only used in errors.
pub fn parse_site(path: &Path, contents: &str) -> Result<Site> {
    let file: SiteFile = toml::from_str(contents).map_err(|source| AppError::ParseSite {
        path: path.to_path_buf(),
        source,
    })?;

    let invalid = |message: String| AppError::InvalidSite {
        path: path.to_path_buf(),
        message,
    };

    let kind: ChannelKind = file
        .sender_type
        .parse()
        .map_err(|_| invalid(format!("unknown sender_type {:?}", file.sender_type)))?;

    let mut config = serde_json::to_value(&file.sender)
        .map_err(|e| invalid(format!("sender table is not representable as JSON: {e}")))?;

    if let (Some(id), Some(object)) = (file.id.as_ref(), config.as_object_mut()) {
        object
            .entry("website_name")
            .or_insert_with(|| Value::String(id.clone()));
    }

    Ok(Site {
        id: file.id,
        kind,
        config,
    })
}
