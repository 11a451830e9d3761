//! Password hashing.
//!
//! Passwords are write-only: they are hashed with Argon2id on the way in
//! and never appear in any representation. Verification exists for the
//! benefit of the upstream identity provider, which reads the same table.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur while handling passwords.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    Weak(String),

    /// Password hashing error.
    #[error("password hashing error")]
    Hash,

    /// Password does not match the stored hash.
    #[error("invalid credentials")]
    Mismatch,
}

/// Validate password meets requirements.
///
/// # Errors
///
/// Returns `PasswordError::Weak` if the password is too short.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::Weak(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `PasswordError::Hash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::Hash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `PasswordError::Mismatch` if the password is wrong or the hash
/// is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::Mismatch)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::Mismatch)
}
