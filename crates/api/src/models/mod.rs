//! Domain types, separate from database row types and wire payloads.

pub mod contact;
pub mod customer;
pub mod user;
