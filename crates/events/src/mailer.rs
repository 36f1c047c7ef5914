//! Email delivery via SMTP.
//!
//! [`Mailer::spawn`] starts a background worker that drains a bounded queue
//! of outgoing messages and sends them over the `lettre` async SMTP
//! transport. Configuration is loaded from environment variables; if
//! `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and no
//! mailer should be constructed. Delivery failures are logged, never
//! surfaced to callers.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
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
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@devalign.local";

/// Outgoing queue capacity. Enqueues beyond this are dropped with a warning.
const QUEUE_CAPACITY: usize = 256;

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                   |
    /// |-----------------|----------|---------------------------|
    /// | `SMTP_HOST`     | yes      | (none)                    |
    /// | `SMTP_PORT`     | no       | `587`                     |
    /// | `SMTP_FROM`     | no       | `noreply@devalign.local`  |
    /// | `SMTP_USER`     | no       | (none)                    |
    /// | `SMTP_PASSWORD` | no       | (none)                    |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// One outgoing email.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub title: String,
    pub message: String,
}

/// Cheap handle for enqueueing emails from request handlers.
#[derive(Clone)]
pub struct MailerHandle {
    sender: mpsc::Sender<OutgoingEmail>,
}

impl MailerHandle {
    /// Queue an email without blocking.
    ///
    /// A full queue or a stopped worker drops the email with a warning;
    /// email is best-effort by contract.
    pub fn enqueue(&self, email: OutgoingEmail) {
        if let Err(e) = self.sender.try_send(email) {
            tracing::warn!(error = %e, "Email queue rejected message, dropping");
        }
    }
}

/// Background SMTP worker.
pub struct Mailer {
    config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl Mailer {
    /// Build the SMTP transport and start the delivery worker.
    ///
    /// The worker runs until every [`MailerHandle`] is dropped.
    pub fn spawn(config: EmailConfig) -> Result<(MailerHandle, JoinHandle<()>), EmailError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);
        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        let mailer = Self {
            config,
            transport: builder.build(),
        };

        let (sender, mut receiver) = mpsc::channel::<OutgoingEmail>(QUEUE_CAPACITY);
        let handle = tokio::spawn(async move {
            while let Some(email) = receiver.recv().await {
                if let Err(e) = mailer.deliver(&email).await {
                    tracing::warn!(to = %email.to, error = %e, "Email delivery failed");
                }
            }
            tracing::info!("Email queue closed, mailer shutting down");
        });
        Ok((MailerHandle { sender }, handle))
    }

    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(email.to.parse()?)
            .subject(&email.subject)
            .header(ContentType::TEXT_HTML)
            .body(render_body(&email.title, &email.message))
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.transport.send(message).await?;
        tracing::info!(to = %email.to, subject = %email.subject, "Notification email sent");
        Ok(())
    }
}

/// Render the notification email body.
fn render_body(title: &str, message: &str) -> String {
    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
           <h2 style=\"color: #333;\">{title}</h2>\
           <p style=\"color: #666; line-height: 1.6;\">{message}</p>\
           <hr style=\"border: 1px solid #eee; margin: 20px 0;\">\
           <p style=\"color: #999; font-size: 12px;\">\
             This is an automated message from DevAlign. Please do not reply to this email.\
           </p>\
         </div>"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        std::env::remove_var("SMTP_HOST");
        assert!(EmailConfig::from_env().is_none());
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn body_carries_title_and_message() {
        let body = render_body("Project Created", "You were added to Alpha");
        assert!(body.contains("Project Created"));
        assert!(body.contains("You were added to Alpha"));
        assert!(body.contains("automated message"));
    }
}
