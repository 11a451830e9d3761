//! HTTP route definitions.
//!
//! Route map:
//!
//! | method | path | action |
//! |---|---|---|
//! | POST | `/users` | create user (open) |
//! | GET | `/users` | list users (admin) |
//! | GET | `/users/{id}` | retrieve user (owner/admin) |
//! | PUT, PATCH | `/users/{id}` | update user (owner/admin) |
//! | DELETE | `/users/{id}` | delete user (admin) |
//! | POST | `/customers` | create customer (open, stored as lead) |
//! | GET | `/customers` | list customers (admin) |
//! | GET | `/customers/{id}` | retrieve customer (owner/admin) |
//! | PUT, PATCH | `/customers/{id}` | update customer (owner/admin) |
//! | DELETE | `/customers/{id}` | delete customer (admin, cascades) |
//! | PUT | `/customers/{id}/staff` | replace staff set (owner/admin) |
//! | GET, POST | `/customers/{id}/addresses` | contact records (owner/admin) |
//! | PUT, DELETE | `/customers/{id}/addresses/{contact_id}` | one record |
//!
//! Phones, emails, and websites mirror the address routes under their own
//! segment.

pub mod contacts;
pub mod customers;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the full API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(users::routes())
        .merge(customers::routes())
        .merge(contacts::routes())
}
