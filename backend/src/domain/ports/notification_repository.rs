//! Port abstraction for notification persistence adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewNotification, Notification};

use super::StoreError;

/// Typed access to notification inbox records.
///
/// Notifications are the only entity with a hard delete.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Create a notification, assigning the next id and creation time.
    async fn create(&self, notification: NewNotification) -> Result<Notification, StoreError>;

    /// Fetch a notification by id.
    async fn find(&self, id: i32) -> Result<Option<Notification>, StoreError>;

    /// Notifications visible to one user: addressed to them or global,
    /// newest first.
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Notification>, StoreError>;

    /// Count of unread notifications visible to one user.
    async fn unread_count_for_user(&self, user_id: i32) -> Result<usize, StoreError>;

    /// Move a notification to `read`, stamping the read time.
    async fn mark_read(
        &self,
        id: i32,
        read_at: DateTime<Utc>,
    ) -> Result<Option<Notification>, StoreError>;

    /// Move every unread notification visible to the user to `read`.
    /// Returns the number of records transitioned; zero on repeat calls.
    async fn mark_all_read_for_user(
        &self,
        user_id: i32,
        read_at: DateTime<Utc>,
    ) -> Result<usize, StoreError>;

    /// Permanently remove a notification. Returns false when absent.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}
