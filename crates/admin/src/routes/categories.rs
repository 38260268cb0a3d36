//! Category rename form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use aiza_tasty_core::{Category, CategoryId, FieldErrors};

use super::dashboard::DASHBOARD_PATH;
use super::forms::validate_category_name;
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::models::CurrentStaff;
use crate::state::AppState;

/// Edit category page template.
#[derive(Template, WebTemplate)]
#[template(path = "edit_category.html")]
pub struct EditCategoryTemplate {
    pub staff: CurrentStaff,
    pub category: Category,
    pub name: String,
    pub errors: FieldErrors,
}

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
}

async fn existing(state: &AppState, id: CategoryId) -> Result<Category> {
    state
        .categories()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))
}

pub async fn edit_page(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<EditCategoryTemplate> {
    let category = existing(&state, id).await?;
    Ok(EditCategoryTemplate {
        staff,
        name: category.name.clone(),
        category,
        errors: FieldErrors::new(),
    })
}

#[instrument(skip(state, staff, form), fields(staff = %staff.username))]
pub async fn edit(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let category = existing(&state, id).await?;

    match validate_category_name(&form.name) {
        Ok(name) => {
            state.categories().rename(id, &name).await?;
            tracing::info!(category_id = %id, %name, "category renamed");
            Ok(Redirect::to(DASHBOARD_PATH).into_response())
        }
        Err(errors) => Ok(EditCategoryTemplate {
            staff,
            category,
            name: form.name,
            errors,
        }
        .into_response()),
    }
}
