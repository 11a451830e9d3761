//! User domain types.

use chrono::{DateTime, Utc};

use leadbook_core::{Email, UserId};

/// A Leadbook user (domain type).
///
/// The email address doubles as the login identifier; the password hash
/// never leaves the repository layer.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (globally unique).
    pub email: Email,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional one-to-one profile.
    pub profile: Option<UserProfile>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A user's profile (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Job title (e.g., "Engineer").
    pub title: String,
}
