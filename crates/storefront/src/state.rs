//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use aiza_tasty_core::Category;

use crate::config::StorefrontConfig;
use crate::db::{CatalogRepository, OrderRepository, RepositoryError};
use crate::services::EmailService;

/// How long the navigation category list is reused before re-reading it.
const NAV_CACHE_TTL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    email: EmailService,
    nav_categories: Cache<(), Arc<Vec<Category>>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool, email: EmailService) -> Self {
        let nav_categories = Cache::builder()
            .max_capacity(1)
            .time_to_live(NAV_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                email,
                nav_categories,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the email service.
    #[must_use]
    pub fn email(&self) -> &EmailService {
        &self.inner.email
    }

    /// Catalog queries over the pool.
    #[must_use]
    pub fn catalog(&self) -> CatalogRepository<'_> {
        CatalogRepository::new(&self.inner.pool)
    }

    /// Order writes over the pool.
    #[must_use]
    pub fn orders(&self) -> OrderRepository<'_> {
        OrderRepository::new(&self.inner.pool)
    }

    /// Categories shown in the navigation bar, cached briefly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the categories cannot be read.
    pub async fn nav_categories(&self) -> Result<Arc<Vec<Category>>, RepositoryError> {
        if let Some(categories) = self.inner.nav_categories.get(&()).await {
            tracing::debug!("Cache hit for navigation categories");
            return Ok(categories);
        }

        let categories = Arc::new(self.catalog().categories().await?);
        self.inner
            .nav_categories
            .insert((), Arc::clone(&categories))
            .await;
        Ok(categories)
    }
}
