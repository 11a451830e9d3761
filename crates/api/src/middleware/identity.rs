//! Caller identity extraction.
//!
//! Authentication is delegated to an upstream identity provider (reverse
//! proxy or API gateway) that strips these headers from inbound traffic and
//! re-injects them for authenticated requests. This service only consumes
//! the result; it implements no login, session, or token mechanics.
//!
//! Missing or malformed headers resolve to an anonymous caller rather than
//! a rejection: anonymous access is a legal state (creation is open to
//! unauthenticated callers) and the permission resolver decides what an
//! anonymous caller may do.

use axum::{extract::FromRequestParts, http::request::Parts};

use leadbook_core::UserId;

use crate::permissions::Caller;

/// Header carrying the authenticated user id (decimal integer).
pub const USER_ID_HEADER: &str = "x-leadbook-user-id";

/// Header carrying the admin flag (`true` or `1`).
pub const ADMIN_HEADER: &str = "x-leadbook-admin";

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(caller_from_parts(parts))
    }
}

fn caller_from_parts(parts: &Parts) -> Caller {
    let user_id = parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| {
            s.parse::<i32>()
                .inspect_err(|_| tracing::warn!(header = USER_ID_HEADER, value = %s, "ignoring malformed identity header"))
                .ok()
        })
        .map(UserId::new);

    // The admin flag only counts for authenticated callers.
    let is_admin = user_id.is_some()
        && parts
            .headers
            .get(ADMIN_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|s| s == "true" || s == "1");

    Caller { user_id, is_admin }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/users");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_no_headers_is_anonymous() {
        let caller = caller_from_parts(&parts_with_headers(&[]));
        assert_eq!(caller, Caller::anonymous());
    }

    #[test]
    fn test_user_header() {
        let caller = caller_from_parts(&parts_with_headers(&[(USER_ID_HEADER, "42")]));
        assert_eq!(caller, Caller::user(UserId::new(42)));
    }

    #[test]
    fn test_admin_header() {
        let caller = caller_from_parts(&parts_with_headers(&[
            (USER_ID_HEADER, "7"),
            (ADMIN_HEADER, "true"),
        ]));
        assert!(caller.is_admin);

        let caller = caller_from_parts(&parts_with_headers(&[
            (USER_ID_HEADER, "7"),
            (ADMIN_HEADER, "1"),
        ]));
        assert!(caller.is_admin);
    }

    #[test]
    fn test_admin_without_identity_is_ignored() {
        let caller = caller_from_parts(&parts_with_headers(&[(ADMIN_HEADER, "true")]));
        assert_eq!(caller, Caller::anonymous());
    }

    #[test]
    fn test_malformed_user_id_is_anonymous() {
        let caller = caller_from_parts(&parts_with_headers(&[(USER_ID_HEADER, "not-a-number")]));
        assert_eq!(caller, Caller::anonymous());
    }

    #[test]
    fn test_admin_flag_other_values_ignored() {
        let caller = caller_from_parts(&parts_with_headers(&[
            (USER_ID_HEADER, "7"),
            (ADMIN_HEADER, "yes"),
        ]));
        assert!(!caller.is_admin);
    }
}
