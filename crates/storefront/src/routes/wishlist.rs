//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    response::IntoResponse,
};
use serde::Serialize;
use tracing::instrument;

use aiza_tasty_core::{Product, ProductId, ToggleStatus};

use super::{Layout, path_id};
use crate::error::Result;
use crate::middleware::{OptionalAuth, ShopSession};
use crate::state::AppState;

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist.html")]
pub struct WishlistTemplate {
    pub layout: Layout,
    pub products: Vec<Product>,
}

/// JSON body returned after a toggle.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub success: bool,
    pub wishlist_count: usize,
    pub status: ToggleStatus,
}

/// Display the wishlist, in the order products were added.
///
/// Ids whose product has since been deleted are skipped.
#[instrument(skip(state, shop, user))]
pub async fn show(
    State(state): State<AppState>,
    shop: ShopSession,
    OptionalAuth(user): OptionalAuth,
) -> Result<impl IntoResponse> {
    let ids = shop.wishlist.ids();
    let mut found = state.catalog().products(ids).await?;

    let mut products = Vec::with_capacity(found.len());
    for id in ids {
        if let Some(index) = found.iter().position(|product| product.id == *id) {
            products.push(found.swap_remove(index));
        }
    }

    Ok(WishlistTemplate {
        layout: Layout::load(&state, &shop, user).await?,
        products,
    })
}

/// Add the product to the wishlist, or remove it if already present.
#[instrument(skip(shop, path))]
pub async fn toggle(
    mut shop: ShopSession,
    path: std::result::Result<Path<ProductId>, PathRejection>,
) -> Result<Json<ToggleResponse>> {
    let id = path_id(path)?;
    let toggle = shop.wishlist.toggle(id);
    shop.save_wishlist().await?;

    Ok(Json(ToggleResponse {
        success: true,
        wishlist_count: toggle.count,
        status: toggle.status,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_response_shape() {
        let json = serde_json::to_value(ToggleResponse {
            success: true,
            wishlist_count: 2,
            status: ToggleStatus::Added,
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({"success": true, "wishlist_count": 2, "status": "added"})
        );
    }
}
