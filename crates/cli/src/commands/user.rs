//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create the first superuser
//! aiza-cli user create -u aiza -p 'a long password' --staff --superuser
//!
//! # Create a staff account without superuser rights
//! aiza-cli user create -u baker -e baker@example.com -p 'another password' --staff
//! ```

use sqlx::PgPool;

use aiza_tasty_core::UserId;
use aiza_tasty_storefront::services::auth::{AuthError, AuthService, SignupForm};

use super::CommandError;

/// Flags for a new account.
#[derive(Debug, Clone, Copy, Default)]
pub struct Role {
    pub staff: bool,
    pub superuser: bool,
}

/// Create an account, applying the same rules as the sign-up form.
///
/// A superuser is always staff as well, so the dashboard opens for them.
///
/// # Errors
///
/// Returns an error if the input is invalid or the username is taken.
pub async fn create(
    pool: &PgPool,
    username: &str,
    email: Option<&str>,
    password: &str,
    role: Role,
) -> Result<UserId, CommandError> {
    let form = SignupForm {
        username: username.to_owned(),
        email: email.unwrap_or_default().to_owned(),
        password1: password.to_owned(),
        password2: password.to_owned(),
    };
    let signup = form.validate().map_err(AuthError::Validation)?;

    let is_staff = role.staff || role.superuser;
    let user = AuthService::new(pool)
        .create_user(&signup, is_staff, role.superuser)
        .await?;

    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        is_staff = user.is_staff,
        is_superuser = user.is_superuser,
        "User created"
    );
    Ok(user.id)
}
