//! Staff login and logout.

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

use super::dashboard::DASHBOARD_PATH;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::LOGIN_PATH;
use crate::middleware::{clear_current_staff, set_current_staff};
use crate::models::CurrentStaff;
use crate::services::AuthError;
use crate::state::AppState;

const LOGIN_FAILED: &str = "Please enter the correct username and password for a staff account. \
     Note that both fields may be case-sensitive.";

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub username: String,
    pub error: Option<&'static str>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// GET /auth/login
pub async fn login_page() -> LoginTemplate {
    LoginTemplate {
        username: String::new(),
        error: None,
    }
}

/// POST /auth/login
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match state.auth().login(&form.username, &form.password).await {
        Ok(user) => {
            let staff = CurrentStaff::from(&user);
            set_current_staff(&session, &staff).await?;
            set_sentry_user(&staff.id, &staff.username);
            tracing::info!(user_id = %staff.id, "staff signed in");
            Ok(Redirect::to(DASHBOARD_PATH).into_response())
        }
        Err(AuthError::InvalidCredentials) => Ok(LoginTemplate {
            username: form.username,
            error: Some(LOGIN_FAILED),
        }
        .into_response()),
        Err(err) => Err(err.into()),
    }
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_staff(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to(LOGIN_PATH))
}
