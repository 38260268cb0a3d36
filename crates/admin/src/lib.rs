//! Aiza Tasty admin library.
//!
//! The staff dashboard as a library, so the binary and the integration
//! tests build the same router.
//!
//! Every handler checks the signed-in account's capabilities before doing
//! anything else; see [`middleware::auth`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::DefaultBodyLimit, extract::State, http::StatusCode, routing::get};
use tower_http::services::ServeDir;

use state::AppState;

/// Largest accepted request body; product images are uploaded inline.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Build the admin router without the session, header and Sentry layers.
pub fn app(state: AppState, static_dir: &str) -> Router {
    let media_root = state.config().media_root.clone();

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .nest_service("/media", ServeDir::new(media_root))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
