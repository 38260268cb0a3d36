//! Cart route handlers.
//!
//! The cart lives in the session as a map of product id to quantity and is
//! resolved against current catalog prices on every render.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{
        Path, State,
        rejection::{FormRejection, PathRejection},
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use aiza_tasty_core::{CartLine, Price, ProductId, QuantityChange};

use super::{Layout, is_ajax, path_id};
use crate::error::{Result, json_failure};
use crate::middleware::{OptionalAuth, ShopSession};
use crate::state::AppState;

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub layout: Layout,
    pub lines: Vec<CartLine>,
    pub total: Price,
}

/// JSON body returned to AJAX add-to-cart calls.
#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub success: bool,
    pub cart_count: u64,
}

/// Form data for quantity updates.
///
/// `quantity` is kept as text so a malformed value can be answered with the
/// JSON failure body rather than a form rejection.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    pub quantity: Option<String>,
}

/// JSON body returned after a quantity update.
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub total_items: u64,
}

impl From<QuantityChange> for UpdateResponse {
    fn from(change: QuantityChange) -> Self {
        Self {
            success: true,
            subtotal: change.subtotal.amount(),
            total: change.total.amount(),
            total_items: change.total_items,
        }
    }
}

/// Parse the submitted quantity; a missing field means 1.
fn parse_quantity(raw: Option<&str>) -> Option<i64> {
    match raw.map(str::trim) {
        None => Some(1),
        Some(value) => value.parse().ok(),
    }
}

/// Add one unit of a product to the cart.
#[instrument(skip(state, shop, headers))]
pub async fn add(
    State(state): State<AppState>,
    mut shop: ShopSession,
    path: std::result::Result<Path<ProductId>, PathRejection>,
    headers: HeaderMap,
) -> Result<Response> {
    let id = path_id(path)?;
    let cart_count = shop.cart.add(&state.catalog(), id).await?;
    shop.save_cart().await?;

    if is_ajax(&headers) {
        return Ok(Json(AddResponse {
            success: true,
            cart_count,
        })
        .into_response());
    }

    Ok(Redirect::to("/cart").into_response())
}

/// Display the cart page.
#[instrument(skip(state, shop, user))]
pub async fn show(
    State(state): State<AppState>,
    shop: ShopSession,
    OptionalAuth(user): OptionalAuth,
) -> Result<impl IntoResponse> {
    let snapshot = shop.cart.snapshot(&state.catalog()).await?;

    Ok(CartTemplate {
        layout: Layout::load(&state, &shop, user).await?,
        total: snapshot.total(),
        lines: snapshot.lines().to_vec(),
    })
}

/// Remove a product from the cart.
#[instrument(skip(shop))]
pub async fn remove(
    mut shop: ShopSession,
    path: std::result::Result<Path<ProductId>, PathRejection>,
) -> Result<Redirect> {
    let id = path_id(path)?;
    if shop.cart.remove(id) {
        shop.save_cart().await?;
    }
    Ok(Redirect::to("/cart"))
}

/// Set the quantity of a cart line (AJAX).
///
/// A post without a form body counts as a missing `quantity`.
#[instrument(skip(state, shop, path, form))]
pub async fn update(
    State(state): State<AppState>,
    mut shop: ShopSession,
    path: std::result::Result<Path<ProductId>, PathRejection>,
    form: std::result::Result<Form<UpdateForm>, FormRejection>,
) -> Result<Response> {
    let id = path_id(path)?;
    let raw = match form {
        Ok(Form(form)) => form.quantity,
        Err(FormRejection::InvalidFormContentType(_)) => None,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejecting unreadable quantity form");
            return Ok(json_failure(StatusCode::BAD_REQUEST));
        }
    };

    let Some(quantity) = parse_quantity(raw.as_deref()) else {
        tracing::debug!(raw = ?raw, "rejecting malformed quantity");
        return Ok(json_failure(StatusCode::BAD_REQUEST));
    };

    let change = shop.cart.set_quantity(&state.catalog(), id, quantity).await?;
    shop.save_cart().await?;

    Ok(Json(UpdateResponse::from(change)).into_response())
}

/// Quantity updates only accept POST.
pub async fn update_wrong_method() -> Response {
    json_failure(StatusCode::BAD_REQUEST)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(None), Some(1));
        assert_eq!(parse_quantity(Some("3")), Some(3));
        assert_eq!(parse_quantity(Some(" 0 ")), Some(0));
        assert_eq!(parse_quantity(Some("-2")), Some(-2));
        assert_eq!(parse_quantity(Some("two")), None);
        assert_eq!(parse_quantity(Some("")), None);
    }

    #[test]
    fn test_update_response_serializes_numbers() {
        let body = UpdateResponse::from(QuantityChange {
            subtotal: Price::from_cents(1000),
            total: Price::from_cents(1300),
            total_items: 3,
        });

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["subtotal"].as_f64(), Some(10.0));
        assert_eq!(json["total"].as_f64(), Some(13.0));
        assert_eq!(json["total_items"], 3);
    }

    #[tokio::test]
    async fn test_wrong_method_is_bad_request() {
        let response = update_wrong_method().await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
