//! Email flood alerts via SMTP.
//!
//! One alert is sent per accepted pulse, best-effort: delivery failures are
//! logged by the caller and never block or fail the write path. The message
//! is a fixed template carrying only the server time rendered in the
//! dashboard timezone. Configuration comes from environment variables; if
//! `SMTP_HOST` or `ALERT_EMAIL_TO` is not set, [`EmailConfig::from_env`]
//! returns `None` and no mailer should be constructed.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for alert delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// Notifier contract
// ---------------------------------------------------------------------------

/// Fire-and-forget delivery of a flood alert.
///
/// `triggered_at` is the server time of the accepted pulse, already shifted
/// into the dashboard timezone for display.
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, triggered_at: DateTime<FixedOffset>) -> Result<(), AlertError>;
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "alerts@pulsewatch.local";

/// Configuration for the SMTP alert delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Alert recipient.
    pub to_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` or `ALERT_EMAIL_TO` is not set,
    /// signalling that alert delivery is not configured and should be
    /// skipped.
    ///
    /// | Variable         | Required | Default                    |
    /// |------------------|----------|----------------------------|
    /// | `SMTP_HOST`      | yes      | --                         |
    /// | `ALERT_EMAIL_TO` | yes      | --                         |
    /// | `SMTP_PORT`      | no       | `587`                      |
    /// | `SMTP_FROM`      | no       | `alerts@pulsewatch.local`  |
    /// | `SMTP_USER`      | no       | --                         |
    /// | `SMTP_PASSWORD`  | no       | --                         |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        let to_address = std::env::var("ALERT_EMAIL_TO").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            to_address,
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailAlerter
// ---------------------------------------------------------------------------

/// Sends flood alert emails via SMTP.
pub struct EmailAlerter {
    config: EmailConfig,
}

impl EmailAlerter {
    /// Create a new alerter with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }
}

/// Subject line for every flood alert.
const ALERT_SUBJECT: &str = "Flood alert: sensor pulse detected";

/// Render the fixed alert body for a trigger time.
fn alert_body(triggered_at: DateTime<FixedOffset>) -> String {
    format!(
        "A new sensor pulse was detected. This area is subject to flooding \
         and requires immediate attention.\n\n\
         Alert time: {} (UTC{})\n\n\
         Monitor conditions continuously and follow the established safety \
         protocols. This is an automated alert from the flood monitoring \
         system.",
        triggered_at.format("%d/%m/%Y %H:%M:%S"),
        triggered_at.format("%:z"),
    )
}

#[async_trait]
impl AlertNotifier for EmailAlerter {
    async fn notify(&self, triggered_at: DateTime<FixedOffset>) -> Result<(), AlertError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(self.config.to_address.parse()?)
            .subject(ALERT_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(alert_body(triggered_at))
            .map_err(|e| AlertError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = %self.config.to_address, "Flood alert email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
