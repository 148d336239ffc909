//! Port abstraction for message persistence adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Message, NewMessage};

use super::StoreError;

/// Typed access to direct and global messages.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Create a message, assigning the next id and creation time.
    async fn create(&self, message: NewMessage) -> Result<Message, StoreError>;

    /// Fetch a message by id.
    async fn find(&self, id: i32) -> Result<Option<Message>, StoreError>;

    /// Messages visible to one user: addressed to them or global.
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Message>, StoreError>;

    /// Stamp the read time on a message.
    async fn mark_read(
        &self,
        id: i32,
        read_at: DateTime<Utc>,
    ) -> Result<Option<Message>, StoreError>;
}
