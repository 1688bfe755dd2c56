//! Access control policy.
//!
//! One explicit `authorize(identity, action, resource)` function, invoked
//! at the top of every handler, replaces scattered per-route permission
//! classes. Rules:
//!
//! ```text
//! ┌──────────────────────────┬───────────┬───────────────┬─────────────┐
//! │ resource                 │ anonymous │ authenticated │ staff       │
//! ├──────────────────────────┼───────────┼───────────────┼─────────────┤
//! │ reference data & trips   │ read      │ read          │ read+write  │
//! │ orders / tickets         │ -         │ own, create   │ own, create │
//! └──────────────────────────┴───────────┴───────────────┴─────────────┘
//! ```
//!
//! "Own" scoping for orders/tickets is enforced by the queries themselves
//! (they filter on the caller's user id); this module only answers
//! allow/deny for the (identity, action, resource) triple.

use crate::error::ApiError;

/// Who is calling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User { id: String, is_staff: bool },
}

impl Identity {
    /// Identity of an authenticated caller.
    pub fn user(id: impl Into<String>, is_staff: bool) -> Self {
        Identity::User {
            id: id.into(),
            is_staff,
        }
    }
}

/// What the caller wants to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Delete,
}

impl Action {
    fn is_read(self) -> bool {
        matches!(self, Action::List | Action::Retrieve)
    }
}

/// What the caller wants to do it to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Stations,
    Routes,
    TrainTypes,
    Trains,
    Crews,
    Trips,
    Orders,
    Tickets,
}

impl Resource {
    fn is_reference_data(self) -> bool {
        !matches!(self, Resource::Orders | Resource::Tickets)
    }
}

/// Decides whether `identity` may perform `action` on `resource`.
///
/// Returns 401 for missing identity where one is required, 403 for an
/// identity that lacks the role. Called before any business validation.
pub fn authorize(identity: &Identity, action: Action, resource: Resource) -> Result<(), ApiError> {
    if resource.is_reference_data() {
        if action.is_read() {
            return Ok(());
        }

        // Writes on reference data and trips are staff-only
        return match identity {
            Identity::Anonymous => Err(ApiError::unauthorized("Authentication required")),
            Identity::User { is_staff: true, .. } => Ok(()),
            Identity::User { .. } => Err(ApiError::forbidden("Staff access required")),
        };
    }

    // Orders and tickets: any authenticated user, own records only
    // (the queries scope by user id); no delete path exists
    match (identity, action) {
        (Identity::Anonymous, _) => Err(ApiError::unauthorized("Authentication required")),
        (Identity::User { .. }, Action::Delete) => {
            Err(ApiError::forbidden("Orders cannot be deleted"))
        }
        (Identity::User { .. }, _) => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn rider() -> Identity {
        Identity::user("user-1", false)
    }

    fn staff() -> Identity {
        Identity::user("admin-1", true)
    }

    #[test]
    fn test_anonymous_reads_reference_data() {
        for resource in [
            Resource::Stations,
            Resource::Routes,
            Resource::TrainTypes,
            Resource::Trains,
            Resource::Crews,
            Resource::Trips,
        ] {
            assert!(authorize(&Identity::Anonymous, Action::List, resource).is_ok());
            assert!(authorize(&Identity::Anonymous, Action::Retrieve, resource).is_ok());
        }
    }

    #[test]
    fn test_reference_writes_are_staff_only() {
        let err = authorize(&Identity::Anonymous, Action::Create, Resource::Stations).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let err = authorize(&rider(), Action::Create, Resource::Trips).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        assert!(authorize(&staff(), Action::Create, Resource::Trips).is_ok());
        assert!(authorize(&staff(), Action::Delete, Resource::Stations).is_ok());
    }

    #[test]
    fn test_orders_require_authentication() {
        let err = authorize(&Identity::Anonymous, Action::List, Resource::Orders).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        assert!(authorize(&rider(), Action::Create, Resource::Orders).is_ok());
        assert!(authorize(&rider(), Action::List, Resource::Orders).is_ok());
        assert!(authorize(&rider(), Action::List, Resource::Tickets).is_ok());
    }

    #[test]
    fn test_orders_cannot_be_deleted() {
        let err = authorize(&staff(), Action::Delete, Resource::Orders).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
