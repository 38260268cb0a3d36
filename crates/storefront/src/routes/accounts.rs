//! Customer sign-up, login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use aiza_tasty_core::FieldErrors;

use super::Layout;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, ShopSession, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::AuthError;
use crate::services::auth::{AuthService, SignupForm};
use crate::state::AppState;

const LOGIN_FAILED: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "accounts/signup.html")]
pub struct SignupTemplate {
    pub layout: Layout,
    pub username: String,
    pub email: String,
    pub errors: FieldErrors,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "accounts/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub username: String,
    pub error: Option<String>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Display the sign-up page.
#[instrument(skip(state, shop, user))]
pub async fn signup_page(
    State(state): State<AppState>,
    shop: ShopSession,
    OptionalAuth(user): OptionalAuth,
) -> Result<impl IntoResponse> {
    Ok(SignupTemplate {
        layout: Layout::load(&state, &shop, user).await?,
        username: String::new(),
        email: String::new(),
        errors: FieldErrors::new(),
    })
}

/// Create a customer account and send the visitor to the login page.
#[instrument(skip(state, shop, user, form), fields(username = %form.username))]
pub async fn signup(
    State(state): State<AppState>,
    shop: ShopSession,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    match AuthService::new(state.pool()).register(&form).await {
        Ok(created) => {
            tracing::info!(user_id = %created.id, "account created");
            Ok(Redirect::to("/accounts/login").into_response())
        }
        Err(AuthError::Validation(errors)) => Ok(SignupTemplate {
            layout: Layout::load(&state, &shop, user).await?,
            username: form.username,
            email: form.email,
            errors,
        }
        .into_response()),
        Err(err) => Err(err.into()),
    }
}

/// Display the login page.
#[instrument(skip(state, shop, user))]
pub async fn login_page(
    State(state): State<AppState>,
    shop: ShopSession,
    OptionalAuth(user): OptionalAuth,
) -> Result<impl IntoResponse> {
    Ok(LoginTemplate {
        layout: Layout::load(&state, &shop, user).await?,
        username: String::new(),
        error: None,
    })
}

/// Sign in and return to the home page.
///
/// The cart and wishlist survive the login because the session is
/// re-keyed rather than replaced.
#[instrument(skip(state, session, shop, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    shop: ShopSession,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => {
            let current = CurrentUser::from(&user);
            set_current_user(&session, &current).await?;
            set_sentry_user(&current.id, &current.username);
            tracing::info!(user_id = %current.id, "user logged in");
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::debug!("login rejected");
            Ok(LoginTemplate {
                layout: Layout::load(&state, &shop, None).await?,
                username: form.username,
                error: Some(LOGIN_FAILED.to_string()),
            }
            .into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// Sign out, ending the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}
