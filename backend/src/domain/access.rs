//! Role-gated access policy.
//!
//! The source system spread its role checks across framework middleware;
//! here they are explicit predicates evaluated before each workflow or
//! store write, independent of any web framework. The gate has no side
//! effects: it either allows the request or reports why it may not proceed.

use crate::domain::{Error, Role, User};

/// Capability level a request must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Always allowed.
    Public,
    /// Any valid session user.
    Authenticated,
    /// Committee members and managers.
    CommitteeOrManager,
    /// Managers only; destructive and user-management writes.
    ManagerOnly,
}

/// Evaluate the capability gate for an optional session user.
///
/// Missing authentication yields `Unauthorized`; an authenticated user with
/// an insufficient role yields `Forbidden`.
pub fn authorize(user: Option<&User>, capability: Capability) -> Result<(), Error> {
    match capability {
        Capability::Public => Ok(()),
        Capability::Authenticated => user.map(|_| ()).ok_or_else(unauthorized),
        Capability::CommitteeOrManager => match user {
            None => Err(unauthorized()),
            Some(user) if user.role.is_committee_or_manager() => Ok(()),
            Some(_) => Err(forbidden()),
        },
        Capability::ManagerOnly => match user {
            None => Err(unauthorized()),
            Some(user) if user.role == Role::Manager => Ok(()),
            Some(_) => Err(forbidden()),
        },
    }
}

fn unauthorized() -> Error {
    Error::unauthorized("login required")
}

fn forbidden() -> Error {
    Error::forbidden("insufficient role for this action")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use chrono::Utc;
    use rstest::rstest;

    fn user(role: Role) -> User {
        User {
            id: 1,
            username: "u".into(),
            password: "p".into(),
            email: "u@example.org".into(),
            first_name: "U".into(),
            last_name: "Ser".into(),
            phone: None,
            address: None,
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn public_always_allows() {
        assert!(authorize(None, Capability::Public).is_ok());
        assert!(authorize(Some(&user(Role::Gardener)), Capability::Public).is_ok());
    }

    #[test]
    fn authenticated_requires_a_session_user() {
        let err = authorize(None, Capability::Authenticated).expect_err("no session");
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert!(authorize(Some(&user(Role::Gardener)), Capability::Authenticated).is_ok());
    }

    #[rstest]
    #[case(Role::Gardener, false)]
    #[case(Role::Committee, true)]
    #[case(Role::Manager, true)]
    fn committee_gate_admits_elevated_roles(#[case] role: Role, #[case] allowed: bool) {
        let result = authorize(Some(&user(role)), Capability::CommitteeOrManager);
        assert_eq!(result.is_ok(), allowed);
        if !allowed {
            assert_eq!(result.expect_err("forbidden").code, ErrorCode::Forbidden);
        }
    }

    #[rstest]
    #[case(Role::Gardener, false)]
    #[case(Role::Committee, false)]
    #[case(Role::Manager, true)]
    fn manager_gate_admits_managers_only(#[case] role: Role, #[case] allowed: bool) {
        assert_eq!(
            authorize(Some(&user(role)), Capability::ManagerOnly).is_ok(),
            allowed
        );
    }

    #[test]
    fn missing_session_beats_role_for_elevated_gates() {
        let err = authorize(None, Capability::ManagerOnly).expect_err("no session");
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }
}
