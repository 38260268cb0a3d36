//! Account list and superuser-only account deletion.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::instrument;

use aiza_tasty_core::{User, UserId};

use crate::error::{AppError, Result};
use crate::middleware::{RequireStaff, RequireSuperuser};
use crate::models::CurrentStaff;
use crate::state::AppState;

const USERS_PATH: &str = "/myadmin/users";

/// User list template.
#[derive(Template, WebTemplate)]
#[template(path = "users.html")]
pub struct UsersTemplate {
    pub staff: CurrentStaff,
    pub users: Vec<User>,
}

pub async fn index(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
) -> Result<UsersTemplate> {
    Ok(UsersTemplate {
        staff,
        users: state.users().list().await?,
    })
}

/// Delete an account. Unknown ids are ignored; deleting yourself is refused.
#[instrument(skip(state, staff), fields(staff = %staff.username))]
pub async fn delete(
    RequireSuperuser(staff): RequireSuperuser,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Redirect> {
    if id == staff.id {
        return Err(AppError::Forbidden(
            "you cannot delete your own account".to_string(),
        ));
    }

    let deleted = state.users().delete(id).await?;
    tracing::info!(user_id = %id, deleted, "user deleted");
    Ok(Redirect::to(USERS_PATH))
}
