//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! aiza-cli migrate
//! ```
//!
//! Applies `crates/storefront/migrations/` (catalog, orders, accounts) and
//! creates the `tower_sessions` table used by both web binaries.

use sqlx::PgPool;
use tower_sessions_sqlx_store::PostgresStore;

use super::CommandError;

/// Run every migration against `pool`.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn run(pool: &PgPool) -> Result<(), CommandError> {
    tracing::info!("Running shop migrations...");
    sqlx::migrate!("../storefront/migrations").run(pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
