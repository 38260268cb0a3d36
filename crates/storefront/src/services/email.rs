//! SMTP delivery of order confirmations.
//!
//! Uses lettre's async SMTP transport. The message body is built by
//! checkout; this module only addresses and sends it.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use aiza_tasty_core::{Notification, NotificationError, Notifier};

use crate::config::EmailConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// With credentials the relay is reached over STARTTLS; without them
    /// the connection is plain, which suits a local catch-all mail server.
    ///
    /// # Errors
    ///
    /// Returns error if the relay hostname cannot be used for TLS.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let mailer = match &config.credentials {
            Some((username, password)) => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                    .port(config.smtp_port)
                    .credentials(Credentials::new(
                        username.clone(),
                        password.expose_secret().to_string(),
                    ))
                    .build()
            }
            None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build(),
        };

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// The sender mailbox used for confirmations.
    #[must_use]
    pub fn from_address(&self) -> &str {
        &self.from_address
    }

    /// Send a plain-text notification.
    ///
    /// # Errors
    ///
    /// Returns error if an address is invalid or the relay refuses the message.
    pub async fn send_notification(&self, notification: &Notification) -> Result<(), EmailError> {
        let message = build_message(notification)?;
        self.mailer.send(message).await?;

        tracing::info!(
            to = notification.to.len(),
            subject = %notification.subject,
            "Email sent successfully"
        );
        Ok(())
    }
}

impl Notifier for EmailService {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        self.send_notification(notification)
            .await
            .map_err(|e| NotificationError(Box::new(e)))
    }
}

/// Turn a notification into a lettre message.
fn build_message(notification: &Notification) -> Result<Message, EmailError> {
    let from: Mailbox = notification
        .from
        .parse()
        .map_err(|_| EmailError::InvalidAddress(notification.from.clone()))?;

    let mut builder = Message::builder()
        .from(from)
        .subject(&notification.subject)
        .header(ContentType::TEXT_PLAIN);

    for to in &notification.to {
        let mailbox: Mailbox = to
            .as_str()
            .parse()
            .map_err(|_| EmailError::InvalidAddress(to.to_string()))?;
        builder = builder.to(mailbox);
    }

    Ok(builder.body(notification.body.clone())?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use aiza_tasty_core::Email;

    use super::*;

    fn notification(from: &str) -> Notification {
        Notification {
            subject: "Order Confirmation - Aiza Tasty Pastries (#7)".to_owned(),
            body: "Hello Aiza,\n\nOrder ID: 7\n".to_owned(),
            from: from.to_owned(),
            to: vec![Email::parse("aiza@example.com").unwrap()],
        }
    }

    #[test]
    fn test_build_message_headers() {
        let message = build_message(&notification("Aiza Tasty <orders@aizatasty.com>")).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("Subject: Order Confirmation - Aiza Tasty Pastries (#7)"));
        assert!(formatted.contains("To: aiza@example.com"));
        assert!(formatted.contains("orders@aizatasty.com"));
        assert!(formatted.contains("Order ID: 7"));
    }

    #[test]
    fn test_build_message_rejects_bad_sender() {
        assert!(matches!(
            build_message(&notification("not a mailbox")),
            Err(EmailError::InvalidAddress(_))
        ));
    }
}
