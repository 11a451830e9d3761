//! Permission resolver.
//!
//! A pure lookup over `(action, caller, record owner)` shared by every
//! resource type:
//!
//! | action | rule |
//! |---|---|
//! | create | anyone, including unauthenticated callers |
//! | retrieve / update / partial update | record owner or admin |
//! | list / delete | admin only |
//!
//! The resolver never touches the store; handlers gate on it before any
//! database access they can, and denial surfaces as a generic
//! [`AppError::Forbidden`] so unauthorized callers learn nothing about the
//! target record.

use leadbook_core::UserId;

use crate::error::AppError;

/// The CRUD action being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Retrieve,
    List,
    Update,
    PartialUpdate,
    Delete,
}

/// The caller's identity, as resolved by the upstream identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    /// Authenticated user id, `None` for anonymous callers.
    pub user_id: Option<UserId>,
    /// Whether the identity provider marked the caller as an admin.
    pub is_admin: bool,
}

impl Caller {
    /// An unauthenticated caller.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user_id: None,
            is_admin: false,
        }
    }

    /// An authenticated non-admin caller.
    #[must_use]
    pub const fn user(id: UserId) -> Self {
        Self {
            user_id: Some(id),
            is_admin: false,
        }
    }

    /// An authenticated admin caller.
    #[must_use]
    pub const fn admin(id: UserId) -> Self {
        Self {
            user_id: Some(id),
            is_admin: true,
        }
    }

    /// Whether the caller carries an authenticated identity.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Outcome of a permission lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Resolve whether `caller` may perform `action` on a record owned by
/// `owner` (`None` when the record has no owner, e.g. an anonymously
/// created customer).
#[must_use]
pub fn resolve(action: Action, caller: &Caller, owner: Option<UserId>) -> Decision {
    let allowed = match action {
        Action::Create => true,
        Action::Retrieve | Action::Update | Action::PartialUpdate => {
            caller.is_admin || matches!((caller.user_id, owner), (Some(c), Some(o)) if c == o)
        }
        Action::List | Action::Delete => caller.is_admin,
    };

    if allowed { Decision::Allow } else { Decision::Deny }
}

/// Resolve and convert a deny into [`AppError::Forbidden`].
///
/// # Errors
///
/// Returns `AppError::Forbidden` when the lookup denies.
pub fn authorize(action: Action, caller: &Caller, owner: Option<UserId>) -> Result<(), AppError> {
    match resolve(action, caller, owner) {
        Decision::Allow => Ok(()),
        Decision::Deny => Err(AppError::Forbidden),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const OWNER: UserId = UserId::new(1);
    const OTHER: UserId = UserId::new(2);

    #[test]
    fn test_create_allows_anonymous() {
        assert_eq!(
            resolve(Action::Create, &Caller::anonymous(), None),
            Decision::Allow
        );
    }

    #[test]
    fn test_create_allows_any_user() {
        assert_eq!(
            resolve(Action::Create, &Caller::user(OTHER), None),
            Decision::Allow
        );
        assert_eq!(
            resolve(Action::Create, &Caller::admin(OTHER), None),
            Decision::Allow
        );
    }

    #[test]
    fn test_retrieve_allows_owner() {
        assert_eq!(
            resolve(Action::Retrieve, &Caller::user(OWNER), Some(OWNER)),
            Decision::Allow
        );
    }

    #[test]
    fn test_retrieve_denies_other_user() {
        assert_eq!(
            resolve(Action::Retrieve, &Caller::user(OTHER), Some(OWNER)),
            Decision::Deny
        );
    }

    #[test]
    fn test_retrieve_denies_anonymous() {
        assert_eq!(
            resolve(Action::Retrieve, &Caller::anonymous(), Some(OWNER)),
            Decision::Deny
        );
    }

    #[test]
    fn test_retrieve_allows_admin_for_any_record() {
        assert_eq!(
            resolve(Action::Retrieve, &Caller::admin(OTHER), Some(OWNER)),
            Decision::Allow
        );
        assert_eq!(
            resolve(Action::Retrieve, &Caller::admin(OTHER), None),
            Decision::Allow
        );
    }

    #[test]
    fn test_ownerless_record_denies_non_admin() {
        // Anonymously created customers have no owner; only admins may act.
        assert_eq!(
            resolve(Action::Update, &Caller::user(OWNER), None),
            Decision::Deny
        );
    }

    #[test]
    fn test_update_variants_follow_retrieve_rule() {
        for action in [Action::Update, Action::PartialUpdate] {
            assert_eq!(
                resolve(action, &Caller::user(OWNER), Some(OWNER)),
                Decision::Allow
            );
            assert_eq!(
                resolve(action, &Caller::user(OTHER), Some(OWNER)),
                Decision::Deny
            );
            assert_eq!(
                resolve(action, &Caller::admin(OTHER), Some(OWNER)),
                Decision::Allow
            );
        }
    }

    #[test]
    fn test_list_and_delete_are_admin_only() {
        for action in [Action::List, Action::Delete] {
            assert_eq!(resolve(action, &Caller::anonymous(), None), Decision::Deny);
            assert_eq!(
                resolve(action, &Caller::user(OWNER), Some(OWNER)),
                Decision::Deny
            );
            assert_eq!(
                resolve(action, &Caller::admin(OTHER), None),
                Decision::Allow
            );
        }
    }

    #[test]
    fn test_authorize_maps_deny_to_forbidden() {
        let err = authorize(Action::List, &Caller::anonymous(), None).unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        assert!(authorize(Action::Create, &Caller::anonymous(), None).is_ok());
    }
}
