//! Database operations for the admin dashboard.
//!
//! The admin shares the shop database with the storefront; the schema is
//! owned by `crates/storefront/migrations/` and applied with:
//! ```bash
//! cargo run -p aiza-tasty-cli -- migrate
//! ```

pub mod analytics;
pub mod categories;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use analytics::{AnalyticsRepository, SalesSummary, TopProduct};
pub use categories::CategoryRepository;
pub use orders::OrderRepository;
pub use products::{ProductInput, ProductRepository};
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Build an `ILIKE` pattern matching `query` anywhere, with wildcards escaped.
pub(crate) fn like_pattern(query: &str) -> String {
    let escaped = query
        .chars()
        .fold(String::with_capacity(query.len()), |mut out, c| {
            if matches!(c, '%' | '_' | '\\') {
                out.push('\\');
            }
            out.push(c);
            out
        });
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("tart"), "%tart%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
    }
}
