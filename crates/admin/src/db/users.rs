//! Site account queries for the users page and staff login.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use aiza_tasty_core::{Email, User, UserId};

use super::RepositoryError;

const SELECT_USERS: &str =
    "SELECT id, username, email, is_staff, is_superuser, date_joined FROM app_user";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    email: Option<String>,
    is_staff: bool,
    is_superuser: bool,
    date_joined: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = row
            .email
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(Email::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email for user {}: {e}", row.id))
            })?;

        Ok(Self {
            id: UserId::new(row.id),
            username: row.username,
            email,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
            date_joined: row.date_joined,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// Repository for site accounts.
#[derive(Clone, Copy)]
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All accounts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!("{SELECT_USERS} ORDER BY date_joined, id"))
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Look up an account and its password hash by username, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row: Option<UserWithHashRow> = sqlx::query_as(
            "SELECT id, username, email, is_staff, is_superuser, date_joined, password_hash \
             FROM app_user WHERE lower(username) = lower($1)",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        row.map(|row| Ok((row.user.try_into()?, row.password_hash)))
            .transpose()
    }

    /// Delete an account. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM app_user WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
