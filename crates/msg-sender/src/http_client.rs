use std::{sync::OnceLock, time::Duration};

use tracing::{debug, warn};

/// Install the aws-lc-rs rustls provider process-wide.
///
/// Both reqwest (`*-no-provider`) and lettre expect a default provider.
pub fn install_rustls_provider() {
    static PROVIDER_INSTALLED: OnceLock<()> = OnceLock::new();
    PROVIDER_INSTALLED.get_or_init(|| {
        if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
            // Safe to ignore: can happen if another crate installed it first.
            debug!(existing_provider = ?e, "rustls CryptoProvider already installed");
        }
    });
}

/// Build the single-use client for one dispatch.
///
/// A zero or absent timeout leaves requests unbounded.
pub fn build_client(request_timeout: Option<Duration>) -> reqwest::Client {
    install_rustls_provider();

    let mut builder = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .user_agent(concat!("msg-sender/", env!("CARGO_PKG_VERSION")));

    if let Some(timeout) = request_timeout.filter(|t| *t > Duration::ZERO) {
        builder = builder.timeout(timeout);
    }

    builder.build().unwrap_or_else(|error| {
        warn!(
            error = %error,
            "Failed to create configured HTTP client; falling back to reqwest defaults"
        );
        reqwest::Client::new()
    })
}
