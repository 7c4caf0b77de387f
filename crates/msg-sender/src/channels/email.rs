//! Email notification channel using SMTP.
//!
//! Connects with implicit TLS to the configured host and port, authenticates
//! with the configured credentials and submits one HTML message. The SMTP
//! session sits behind [`EmailTransport`] so tests can swap in a recorder.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use super::NotificationChannel;
use crate::compose::compose_email;
use crate::config::EmailSettings;
use crate::error::{TransportError, error_chain};
use crate::http_client::install_rustls_provider;
use crate::message::NotificationMessage;

/// Submits a built message. One call, one attempt.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send_email(&self, message: Message) -> Result<(), TransportError>;
}

/// lettre SMTP transport with implicit TLS and static credentials.
pub struct SmtpTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    /// Prepare a session to `hostname:port`. Nothing is dialed until
    /// [`EmailTransport::send_email`].
    pub fn new(settings: &EmailSettings, timeout: Option<Duration>) -> Result<Self, TransportError> {
        install_rustls_provider();

        let port = settings.port_number().ok_or_else(|| {
            TransportError::invalid_envelope(format!("invalid SMTP port {}", settings.port))
        })?;

        let tls = TlsParameters::new(settings.hostname.clone()).map_err(|e| {
            TransportError::connection(format!(
                "TLS setup for {} failed: {}",
                settings.hostname,
                error_chain(&e)
            ))
        })?;

        let inner = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.hostname)
            .port(port)
            .tls(Tls::Wrapper(tls))
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .timeout(timeout)
            .build();

        Ok(Self { inner })
    }
}

#[async_trait]
impl EmailTransport for SmtpTransport {
    async fn send_email(&self, message: Message) -> Result<(), TransportError> {
        self.inner
            .send(message)
            .await
            .map(|response| {
                debug!(code = %response.code(), "SMTP server accepted message");
            })
            .map_err(|e| TransportError::connection(error_chain(&e)))
    }
}

/// Email notification channel.
pub struct EmailChannel {
    settings: EmailSettings,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn EmailTransport>>,
}

impl EmailChannel {
    /// Create a new Email channel that dials SMTP on send.
    pub fn new(settings: EmailSettings, timeout: Option<Duration>) -> Self {
        Self {
            settings,
            timeout,
            transport: None,
        }
    }

    /// Create an Email channel over an existing transport.
    pub fn with_transport(settings: EmailSettings, transport: Arc<dyn EmailTransport>) -> Self {
        Self {
            settings,
            timeout: None,
            transport: Some(transport),
        }
    }

    /// Build the outgoing message: sender is the SMTP username, recipient the
    /// configured `mailto`.
    pub fn build_message(&self, message: &NotificationMessage) -> Result<Message, TransportError> {
        let from: Mailbox = self.settings.username.parse().map_err(|e| {
            TransportError::invalid_envelope(format!(
                "sender address {:?}: {}",
                self.settings.username, e
            ))
        })?;
        let to: Mailbox = self.settings.mailto.parse().map_err(|e| {
            TransportError::invalid_envelope(format!(
                "recipient address {:?}: {}",
                self.settings.mailto, e
            ))
        })?;

        let payload = compose_email(&self.settings, message);

        Message::builder()
            .from(from)
            .to(to)
            .subject(payload.subject)
            .header(ContentType::TEXT_HTML)
            .body(payload.html)
            .map_err(|e| TransportError::invalid_envelope(format!("failed to build email: {e}")))
    }

    fn transport(&self) -> Result<Arc<dyn EmailTransport>, TransportError> {
        match &self.transport {
            Some(transport) => Ok(Arc::clone(transport)),
            None => Ok(Arc::new(SmtpTransport::new(&self.settings, self.timeout)?)),
        }
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn channel_type(&self) -> &'static str {
        "email"
    }

    async fn send(&self, message: &NotificationMessage) -> Result<(), TransportError> {
        let email = self.build_message(message)?;
        let transport = self.transport()?;

        debug!(
            host = %self.settings.hostname,
            port = %self.settings.port,
            site = %self.settings.website_name,
            "Submitting email notification"
        );
        transport.send_email(email).await?;

        info!(site = %self.settings.website_name, "Email notification delivered");
        Ok(())
    }
}
