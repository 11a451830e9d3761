//! User repository for database operations.
//!
//! A user and its optional profile are one logical unit: creation and
//! profile-touching updates run inside a single transaction so either both
//! records persist or neither does.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use leadbook_core::{Email, UserId};

use super::RepositoryError;
use crate::models::user::{User, UserProfile};

/// Fields required to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    /// Argon2id hash, never the plaintext.
    pub password_hash: String,
    pub profile_title: Option<String>,
}

/// Mutable fields of a user.
///
/// Only the email and the profile title are writable through the API;
/// everything else passes through unchanged. `None` means "keep".
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<Email>,
    pub profile_title: Option<String>,
}

/// A user row joined with its optional profile.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    first_name: String,
    last_name: String,
    profile_title: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            email,
            first_name: self.first_name,
            last_name: self.last_name,
            profile: self.profile_title.map(|title| UserProfile { title }),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_USER: &str = r"
    SELECT u.id, u.email, u.first_name, u.last_name,
           p.title AS profile_title,
           u.created_at, u.updated_at
    FROM users u
    LEFT JOIN user_profiles p ON p.user_id = u.id
";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a user and, if a title was supplied, its profile record.
    ///
    /// Both inserts run inside one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewUser) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (id, created_at, updated_at): (i32, DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
            r"
            INSERT INTO users (email, first_name, last_name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at, updated_at
            ",
        )
        .bind(new.email.as_str())
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "email"))?;

        if let Some(title) = &new.profile_title {
            sqlx::query("INSERT INTO user_profiles (user_id, title) VALUES ($1, $2)")
                .bind(id)
                .bind(title)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(User {
            id: UserId::new(id),
            email: new.email.clone(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            profile: new
                .profile_title
                .clone()
                .map(|title| UserProfile { title }),
            created_at,
            updated_at,
        })
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("{SELECT_USER} WHERE u.id = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// List all users, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let sql = format!("{SELECT_USER} ORDER BY u.id");
        let rows: Vec<UserRow> = sqlx::query_as(&sql).fetch_all(self.pool).await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    /// Apply the writable field changes to a user.
    ///
    /// The user update and the profile upsert run inside one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new email is taken.
    pub async fn update(&self, id: UserId, changes: &UserChanges) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE users
            SET email = COALESCE($2, email), updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .bind(changes.email.as_ref().map(Email::as_str))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "email"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        if let Some(title) = &changes.profile_title {
            sqlx::query(
                r"
                INSERT INTO user_profiles (user_id, title)
                VALUES ($1, $2)
                ON CONFLICT (user_id) DO UPDATE SET title = excluded.title
                ",
            )
            .bind(id.as_i32())
            .bind(title)
            .execute(&mut *tx)
            .await?;
        }

        let sql = format!("{SELECT_USER} WHERE u.id = $1");
        let row: UserRow = sqlx::query_as(&sql)
            .bind(id.as_i32())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        row.into_user()
    }

    /// Delete a user.
    ///
    /// The profile row goes with it (FK cascade).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
