//! User payloads and representations.
//!
//! The password is write-only: it is accepted on create, hashed before it
//! reaches the repository, and never serialized back out. Updates only
//! touch the email and the profile title; everything else passes through
//! unchanged.

use serde::{Deserialize, Serialize};

use leadbook_core::{Email, UserId};

use crate::db::users::{NewUser, UserChanges};
use crate::error::{AppError, FieldError};
use crate::models::user::User;
use crate::password;

/// Embedded profile payload (`{"title": "Engineer"}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilePayload {
    pub title: String,
}

/// Payload to create a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    #[serde(default)]
    pub profile: Option<ProfilePayload>,
}

impl CreateUserRequest {
    /// Validate the payload and derive the password hash.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` with one entry per bad field, or
    /// `AppError::Internal` if hashing fails.
    pub fn into_new_user(self) -> Result<NewUser, AppError> {
        let mut errors = Vec::new();

        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.push(FieldError::new("email", e));
                None
            }
        };

        if self.first_name.trim().is_empty() {
            errors.push(FieldError::new("first_name", "must not be empty"));
        }
        if self.last_name.trim().is_empty() {
            errors.push(FieldError::new("last_name", "must not be empty"));
        }
        if let Err(e) = password::validate_password(&self.password) {
            errors.push(FieldError::new("password", e));
        }
        if let Some(profile) = &self.profile
            && profile.title.trim().is_empty()
        {
            errors.push(FieldError::new("profile.title", "must not be empty"));
        }

        let Some(email) = email.filter(|_| errors.is_empty()) else {
            return Err(AppError::Validation(errors));
        };

        let password_hash = password::hash_password(&self.password)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(NewUser {
            email,
            first_name: self.first_name,
            last_name: self.last_name,
            password_hash,
            profile_title: self.profile.map(|p| p.title),
        })
    }
}

/// Payload to update a user. Absent fields are kept as-is.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile: Option<ProfilePayload>,
}

impl UpdateUserRequest {
    /// Validate the payload into repository changes.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` with one entry per bad field.
    pub fn into_changes(self) -> Result<UserChanges, AppError> {
        let mut errors = Vec::new();

        let email = match self.email.as_deref().map(Email::parse).transpose() {
            Ok(email) => email,
            Err(e) => {
                errors.push(FieldError::new("email", e));
                None
            }
        };

        if let Some(profile) = &self.profile
            && profile.title.trim().is_empty()
        {
            errors.push(FieldError::new("profile.title", "must not be empty"));
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(UserChanges {
            email,
            profile_title: self.profile.map(|p| p.title),
        })
    }
}

/// Caller-facing representation of a user. No password, ever.
#[derive(Debug, Serialize)]
pub struct UserRepr {
    pub url: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile: Option<ProfilePayload>,
}

impl UserRepr {
    /// Build the representation, including the canonical URL.
    #[must_use]
    pub fn from_user(user: &User, base_url: &str) -> Self {
        Self {
            url: user_url(base_url, user.id),
            email: user.email.as_str().to_owned(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile: user.profile.as_ref().map(|p| ProfilePayload {
                title: p.title.clone(),
            }),
        }
    }
}

/// Canonical URL of a user resource.
#[must_use]
pub fn user_url(base_url: &str, id: UserId) -> String {
    format!("{base_url}/users/{id}")
}
