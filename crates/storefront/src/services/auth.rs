//! Password authentication for site accounts.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use aiza_tasty_core::{Email, EmailError, FieldErrors, User};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum username length.
const MAX_USERNAME_LENGTH: usize = 150;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong username or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The submitted form has problems.
    #[error("invalid form: {0}")]
    Validation(FieldErrors),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// The sign-up form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

/// A sign-up that passed validation.
#[derive(Debug, Clone)]
pub struct ValidSignup {
    pub username: String,
    pub email: Option<Email>,
    pub password: String,
}

impl SignupForm {
    /// Check the form, collecting every problem.
    ///
    /// # Errors
    ///
    /// Returns per-field messages when anything is wrong.
    pub fn validate(&self) -> Result<ValidSignup, FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = self.username.trim();
        if username.is_empty() {
            errors.add("username", "This field is required.");
        } else if username.chars().count() > MAX_USERNAME_LENGTH {
            errors.add(
                "username",
                format!("Ensure this value has at most {MAX_USERNAME_LENGTH} characters."),
            );
        } else if !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            errors.add(
                "username",
                "Enter a valid username. Use letters, digits and @/./+/-/_ only.",
            );
        }

        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(EmailError::Empty) => None,
            Err(err) => {
                errors.add("email", err.to_string());
                None
            }
        };

        if let Err(message) = validate_password(&self.password1) {
            errors.add("password1", message);
        }
        if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        errors.into_result(ValidSignup {
            username: username.to_owned(),
            email,
            password: self.password1.clone(),
        })
    }
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a customer account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the form is invalid or the username
    /// is taken.
    pub async fn register(&self, form: &SignupForm) -> Result<User, AuthError> {
        let signup = form.validate().map_err(AuthError::Validation)?;
        self.create_user(&signup, false, false).await
    }

    /// Create an account with explicit capability flags.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the username is taken.
    pub async fn create_user(
        &self,
        signup: &ValidSignup,
        is_staff: bool,
        is_superuser: bool,
    ) -> Result<User, AuthError> {
        let password_hash = hash_password(&signup.password)?;

        self.users
            .create(NewUser {
                username: &signup.username,
                email: signup.email.as_ref(),
                password_hash: &password_hash,
                is_staff,
                is_superuser,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    let mut errors = FieldErrors::new();
                    errors.add("username", "A user with that username already exists.");
                    AuthError::Validation(errors)
                }
                other => AuthError::Repository(other),
            })
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .users
            .get_with_password_hash(username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err("This password is entirely numeric.".to_owned());
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
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
    use super::*;

    fn form(username: &str, password1: &str, password2: &str) -> SignupForm {
        SignupForm {
            username: username.to_owned(),
            email: String::new(),
            password1: password1.to_owned(),
            password2: password2.to_owned(),
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("croissant-lover").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("croissant-lover", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("anything", "not-a-hash").is_err());
    }

    #[test]
    fn test_signup_validation() {
        let valid = form("aiza", "sweet-treats", "sweet-treats").validate().unwrap();
        assert_eq!(valid.username, "aiza");
        assert!(valid.email.is_none());

        let errors = form("", "short", "other").validate().unwrap_err();
        assert!(errors.get("username").is_some());
        assert!(errors.get("password1").is_some());
        assert!(errors.get("password2").is_some());

        let errors = form("aiza", "12345678", "12345678").validate().unwrap_err();
        assert_eq!(errors.get("password1"), Some("This password is entirely numeric."));

        let errors = form("no spaces", "sweet-treats", "sweet-treats").validate().unwrap_err();
        assert!(errors.get("username").is_some());
    }

    #[test]
    fn test_signup_rejects_bad_email() {
        let mut signup = form("aiza", "sweet-treats", "sweet-treats");
        signup.email = "not-an-email".to_owned();
        assert!(signup.validate().unwrap_err().get("email").is_some());
    }
}
