//! The dashboard: catalog overview plus the add-product and add-category
//! forms.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use aiza_tasty_core::{Category, CategoryId, FieldErrors, Order, Product, ProductId};

use super::forms::{MultipartForm, ProductForm, validate_category_name};
use super::products::product_input;
use crate::error::Result;
use crate::middleware::RequireStaff;
use crate::models::CurrentStaff;
use crate::state::AppState;

pub const DASHBOARD_PATH: &str = "/myadmin";

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub staff: CurrentStaff,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub orders: Vec<Order>,
    pub product_form: ProductForm,
    pub product_errors: FieldErrors,
    pub category_name: String,
    pub category_errors: FieldErrors,
}

/// One-click deletes linked from the dashboard tables.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub delete_product: Option<String>,
    pub delete_category: Option<String>,
}

impl DashboardTemplate {
    async fn load(state: &AppState, staff: CurrentStaff) -> Result<Self> {
        Ok(Self {
            staff,
            products: state.products().list().await?,
            categories: state.categories().list().await?,
            orders: state.orders().list().await?,
            product_form: ProductForm::default(),
            product_errors: FieldErrors::new(),
            category_name: String::new(),
            category_errors: FieldErrors::new(),
        })
    }
}

/// Show the dashboard, or apply a `?delete_product=` / `?delete_category=`.
#[instrument(skip(state, staff), fields(staff = %staff.username))]
pub async fn show(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response> {
    if let Some(raw) = query.delete_product.as_deref().filter(|raw| !raw.is_empty()) {
        if let Ok(id) = raw.parse::<ProductId>() {
            let deleted = state.products().delete(id).await?;
            tracing::info!(product_id = %id, deleted, "product deleted from dashboard");
        }
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }

    if let Some(raw) = query.delete_category.as_deref().filter(|raw| !raw.is_empty()) {
        if let Ok(id) = raw.parse::<CategoryId>() {
            let deleted = state.categories().delete(id).await?;
            tracing::info!(category_id = %id, deleted, "category deleted from dashboard");
        }
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }

    Ok(DashboardTemplate::load(&state, staff).await?.into_response())
}

/// Handle the add-product and add-category forms.
#[instrument(skip_all, fields(staff = %staff.username))]
pub async fn submit(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let form = MultipartForm::read(multipart).await?;
    let mut page = DashboardTemplate::load(&state, staff).await?;

    if form.has("add_product") {
        match product_input(&state, &form, &page.categories).await? {
            Ok(input) => {
                let id = state.products().create(&input).await?;
                tracing::info!(product_id = %id, name = %input.name, "product created");
                return Ok(Redirect::to(DASHBOARD_PATH).into_response());
            }
            Err(errors) => {
                page.product_form = form.product();
                page.product_errors = errors;
            }
        }
    } else if form.has("add_category") {
        match validate_category_name(form.get("name")) {
            Ok(name) => {
                let id = state.categories().create(&name).await?;
                tracing::info!(category_id = %id, %name, "category created");
                return Ok(Redirect::to(DASHBOARD_PATH).into_response());
            }
            Err(errors) => {
                form.get("name").clone_into(&mut page.category_name);
                page.category_errors = errors;
            }
        }
    }

    Ok(page.into_response())
}
