//! Port abstraction for garden event persistence adapters.

use async_trait::async_trait;

use crate::domain::{Event, NewEvent};

use super::StoreError;

/// Typed access to garden events.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Create an event, assigning the next id.
    async fn create(&self, event: NewEvent) -> Result<Event, StoreError>;

    /// Fetch an event by id.
    async fn find(&self, id: i32) -> Result<Option<Event>, StoreError>;

    /// All events.
    async fn list(&self) -> Result<Vec<Event>, StoreError>;
}
