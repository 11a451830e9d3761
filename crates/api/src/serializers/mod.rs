//! Wire payloads and representations.
//!
//! Request payloads validate into repository input types; field-level
//! failures come back as one field-tagged [`crate::error::AppError::Validation`]
//! covering every bad field at once, and nothing is persisted. Response
//! representations are self-describing records carrying a canonical `url`.

pub mod contact;
pub mod customer;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Used with `#[serde(default, deserialize_with = "double_option")]` on an
/// `Option<Option<T>>`: a missing field stays `None`, `null` becomes
/// `Some(None)`, a value becomes `Some(Some(v))`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
