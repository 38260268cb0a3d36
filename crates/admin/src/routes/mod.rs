//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /auth/login                    - Login page
//! POST /auth/login                    - Verify staff credentials
//! POST /auth/logout                   - Logout
//!
//! GET  /myadmin                       - Dashboard (?delete_product= / ?delete_category=)
//! POST /myadmin                       - Add product or category (multipart)
//! GET  /myadmin/edit/{id}             - Edit product form
//! POST /myadmin/edit/{id}             - Save product (multipart)
//! GET  /myadmin/delete/{id}           - Delete product
//! GET  /delete-product/{id}           - Delete product (alias)
//! POST /myadmin/bulk_delete           - Delete checked products
//! GET  /myadmin/search?q=             - Product search
//! GET  /edit-category/{id}            - Edit category form (also under /myadmin)
//! POST /edit-category/{id}            - Save category (also under /myadmin)
//!
//! GET  /myadmin/orders                - Order list
//! GET  /myadmin/orders/{id}           - Order detail
//! POST /myadmin/orders/{id}/status    - Change order status
//!
//! GET  /myadmin/users                 - Account list
//! POST /myadmin/delete_user/{id}      - Delete account (superuser only)
//!
//! GET  /myadmin/analytics             - Sales summary
//! GET  /myadmin/gallery               - Product images
//! GET  /myadmin/notifications         - {"new_orders": n}
//! GET  /myadmin/export                - products.csv
//! ```

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod export;
pub mod forms;
pub mod insights;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to(dashboard::DASHBOARD_PATH) }))
        // Auth
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // Catalog
        .route(
            "/myadmin",
            get(dashboard::show).post(dashboard::submit),
        )
        .route(
            "/myadmin/edit/{id}",
            get(products::edit_page).post(products::edit),
        )
        .route("/myadmin/delete/{id}", get(products::delete).post(products::delete))
        .route("/delete-product/{id}", get(products::delete).post(products::delete))
        .route("/myadmin/bulk_delete", post(products::bulk_delete))
        .route("/myadmin/search", get(products::search))
        .route("/myadmin/gallery", get(products::gallery))
        .route("/myadmin/export", get(export::export))
        .route(
            "/edit-category/{id}",
            get(categories::edit_page).post(categories::edit),
        )
        .route(
            "/myadmin/edit-category/{id}",
            get(categories::edit_page).post(categories::edit),
        )
        // Orders
        .route("/myadmin/orders", get(orders::index))
        .route("/myadmin/orders/{id}", get(orders::show))
        .route("/myadmin/orders/{id}/status", post(orders::update_status))
        // Users
        .route("/myadmin/users", get(users::index))
        .route("/myadmin/delete_user/{id}", post(users::delete))
        // Insights
        .route("/myadmin/analytics", get(insights::analytics))
        .route("/myadmin/notifications", get(insights::notifications))
}
