//! User entity and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Membership role controlling what a user may do.
///
/// `Committee` and `Manager` share most elevated reads; destructive and
/// user-management writes remain manager-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Gardener,
    Committee,
    Manager,
}

impl Role {
    /// True for the elevated roles that may review applications and see
    /// other members' data.
    pub fn is_committee_or_manager(self) -> bool {
        matches!(self, Self::Committee | Self::Manager)
    }
}

/// Registered member of the garden.
///
/// `username` and `email` are unique across all users; the registration
/// flow pre-checks both before creating a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Opaque credential; storage mechanics are outside this crate's scope.
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Full name used when addressing the user in email.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for creating a user record.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Role,
}

/// Shallow-merge patch for user-management writes; absent fields are
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevated_roles_are_committee_and_manager() {
        assert!(!Role::Gardener.is_committee_or_manager());
        assert!(Role::Committee.is_committee_or_manager());
        assert!(Role::Manager.is_committee_or_manager());
    }

    #[test]
    fn password_is_never_serialised() {
        let user = User {
            id: 1,
            username: "ada".into(),
            password: "secret".into(),
            email: "ada@example.org".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            phone: None,
            address: None,
            role: Role::Gardener,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).expect("serialise user");
        assert!(value.get("password").is_none());
        assert_eq!(
            value.get("firstName").and_then(serde_json::Value::as_str),
            Some("Ada")
        );
    }
}
