//! Port abstraction for user persistence adapters.

use async_trait::async_trait;

use crate::domain::{NewUser, Role, User, UserPatch};

use super::StoreError;

/// Typed create/read/update access to user records.
///
/// Uniqueness of `username` and `email` is pre-checked by callers through
/// the lookup methods; the store itself does not enforce it.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user, assigning the next id and creation timestamp.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// Fetch a user by id.
    async fn find(&self, id: i32) -> Result<Option<User>, StoreError>;

    /// Fetch a user by unique username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Fetch a user by unique email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// All users.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Users holding the given role.
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, StoreError>;

    /// Shallow-merge the patch into an existing user.
    async fn update(&self, id: i32, patch: UserPatch) -> Result<Option<User>, StoreError>;
}
