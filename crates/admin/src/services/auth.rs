//! Staff sign-in.
//!
//! Accounts are created through the storefront sign-up or the CLI; the
//! admin only verifies passwords and checks the staff flag.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use sqlx::PgPool;
use thiserror::Error;

use aiza_tasty_core::User;

use crate::db::{RepositoryError, UserRepository};

/// Errors that can occur during staff sign-in.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username, wrong password, or not a staff account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Authentication service for the admin login form.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Verify a staff member's credentials.
    ///
    /// Customers with a correct password are rejected the same way as a
    /// wrong password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on any mismatch.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .users
            .get_with_password_hash(username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if !user.is_staff {
            tracing::warn!(user_id = %user.id, "non-staff account tried the admin login");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }
}

/// Verify a password against a stored Argon2 hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match
/// or the stored hash is unreadable.
pub fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(password_hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};

    use super::*;

    fn hash(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_verify_password() {
        let stored = hash("correct horse battery");
        assert!(verify_password("correct horse battery", &stored).is_ok());
        assert!(matches!(
            verify_password("wrong", &stored),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_unreadable_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
