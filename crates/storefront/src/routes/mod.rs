//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Home page (?q= switches to search results)
//! GET  /category/{id}            - Category listing (?page=, 6 per page)
//!
//! # Cart
//! GET|POST /add-to-cart/{id}     - Add one unit (JSON for XMLHttpRequest, else redirect)
//! GET  /cart                     - Cart page
//! GET|POST /cart/remove/{id}     - Remove a line, redirect to /cart
//! POST /cart/update/{id}         - Set quantity (JSON); other methods get 400
//!
//! # Wishlist
//! GET  /wishlist                 - Wishlist page
//! GET|POST /wishlist/add/{id}    - Toggle membership (JSON)
//!
//! # Checkout
//! GET  /checkout                 - Contact form and cart review
//! POST /checkout                 - Place the order
//!
//! # Accounts
//! GET|POST /accounts/signup      - Create an account
//! GET|POST /accounts/login       - Sign in
//! GET|POST /accounts/logout      - Sign out
//! ```

pub mod accounts;
pub mod cart;
pub mod category;
pub mod checkout;
pub mod home;
pub mod wishlist;

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, rejection::PathRejection},
    http::HeaderMap,
    routing::{get, post},
};

use aiza_tasty_core::Category;

use crate::error::{AppError, Result};
use crate::middleware::ShopSession;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Data every page template needs for the header and navigation.
pub struct Layout {
    pub categories: Arc<Vec<Category>>,
    pub cart_count: u64,
    pub wishlist_count: usize,
    pub user: Option<CurrentUser>,
}

impl Layout {
    /// Gather navigation categories and the badge counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the categories cannot be read.
    pub async fn load(
        state: &AppState,
        shop: &ShopSession,
        user: Option<CurrentUser>,
    ) -> Result<Self> {
        Ok(Self {
            categories: state.nav_categories().await?,
            cart_count: shop.cart_count(),
            wishlist_count: shop.wishlist_count(),
            user,
        })
    }
}

/// Whether the request came from the shop's `fetch` calls.
#[must_use]
pub fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"))
}

/// Unwrap a numeric path id; anything else names a missing resource.
///
/// # Errors
///
/// Returns `AppError::NotFound` when the segment is not an id.
pub fn path_id<T>(path: std::result::Result<Path<T>, PathRejection>) -> Result<T> {
    path.map(|Path(id)| id)
        .map_err(|rejection| AppError::NotFound(rejection.body_text()))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add-to-cart/{id}", get(cart::add).post(cart::add))
        .route("/cart", get(cart::show))
        .route("/cart/remove/{id}", get(cart::remove).post(cart::remove))
        .route(
            "/cart/update/{id}",
            post(cart::update).fallback(cart::update_wrong_method),
        )
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/wishlist", get(wishlist::show))
        .route(
            "/wishlist/add/{id}",
            get(wishlist::toggle).post(wishlist::toggle),
        )
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", get(accounts::signup_page).post(accounts::signup))
        .route("/login", get(accounts::login_page).post(accounts::login))
        .route("/logout", get(accounts::logout).post(accounts::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/category/{id}", get(category::show))
        .merge(cart_routes())
        .merge(wishlist_routes())
        .route("/checkout", get(checkout::show).post(checkout::place_order))
        .nest("/accounts", account_routes())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_is_ajax() {
        let mut headers = HeaderMap::new();
        assert!(!is_ajax(&headers));

        headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
        assert!(is_ajax(&headers));

        headers.insert("x-requested-with", HeaderValue::from_static("fetch"));
        assert!(!is_ajax(&headers));
    }
}
