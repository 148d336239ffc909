//! Port abstraction for outbound email delivery.
//!
//! Delivery is best-effort everywhere this port is used: callers hand the
//! message to a spawned task and log failures rather than surfacing them.

use async_trait::async_trait;

/// Delivery errors raised by mail adapters. Logged, never propagated to the
/// request that triggered the send.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailerError {
    /// The provider rejected or failed the send.
    #[error("mail delivery failed: {message}")]
    Delivery { message: String },
}

impl MailerError {
    /// Construct a [`MailerError::Delivery`].
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
        }
    }
}

/// A rendered email ready for a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub recipient_name: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

/// Outbound email delivery port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message.
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError>;
}
