//! Repository and delivery ports for the hexagonal boundary.
//!
//! Inbound adapters and domain services depend only on these traits; the
//! in-process memory store is the production adapter for this system and a
//! persistent store can implement the same contracts.

mod application_repository;
mod event_repository;
mod forum_repository;
mod mailer;
mod message_repository;
mod notification_repository;
mod payment_repository;
mod plot_repository;
mod user_repository;
mod work_day_repository;

pub use application_repository::ApplicationRepository;
pub use event_repository::EventRepository;
pub use forum_repository::ForumRepository;
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{EmailMessage, Mailer, MailerError};
pub use message_repository::MessageRepository;
pub use notification_repository::NotificationRepository;
pub use payment_repository::PaymentRepository;
pub use plot_repository::PlotRepository;
pub use user_repository::UserRepository;
pub use work_day_repository::WorkDayRepository;

use crate::domain::Error;

/// Persistence errors raised by repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or its lock was lost.
    #[error("store connection failed: {message}")]
    Connection { message: String },
    /// A query or mutation failed during execution.
    #[error("store query failed: {message}")]
    Query { message: String },
}

impl StoreError {
    /// Construct a [`StoreError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Construct a [`StoreError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::internal(err.to_string())
    }
}
