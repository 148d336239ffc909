//! Port abstraction for application persistence adapters.

use async_trait::async_trait;

use crate::domain::{Application, ApplicationStatus, NewApplication, ProcessingOutcome};

use super::StoreError;

/// Typed create/read/update access to application records.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Create an application, assigning the next id and submission time.
    async fn create(&self, application: NewApplication) -> Result<Application, StoreError>;

    /// Fetch an application by id.
    async fn find(&self, id: i32) -> Result<Option<Application>, StoreError>;

    /// All applications.
    async fn list(&self) -> Result<Vec<Application>, StoreError>;

    /// Applications submitted by one user.
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Application>, StoreError>;

    /// Number of applications ever submitted by the user; feeds the
    /// returning-gardener priority policy.
    async fn count_for_user(&self, user_id: i32) -> Result<usize, StoreError>;

    /// Overwrite the priority score of an application.
    async fn set_priority(&self, id: i32, priority: i32)
        -> Result<Option<Application>, StoreError>;

    /// Atomically apply a processing outcome when the application currently
    /// holds `expected` status. Returns `None` when the application is
    /// missing or has already moved on, leaving it untouched.
    async fn process_if(
        &self,
        id: i32,
        expected: ApplicationStatus,
        outcome: ProcessingOutcome,
    ) -> Result<Option<Application>, StoreError>;
}
