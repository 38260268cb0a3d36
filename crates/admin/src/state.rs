//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::db::{
    AnalyticsRepository, CategoryRepository, OrderRepository, ProductRepository, UserRepository,
};
use crate::services::{AuthService, MediaStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    media: MediaStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let media = MediaStore::new(config.media_root.clone());
        Self {
            inner: Arc::new(AppStateInner { config, pool, media }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Where product images are written.
    #[must_use]
    pub fn media(&self) -> &MediaStore {
        &self.inner.media
    }

    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.inner.pool)
    }

    #[must_use]
    pub fn products(&self) -> ProductRepository<'_> {
        ProductRepository::new(&self.inner.pool)
    }

    #[must_use]
    pub fn categories(&self) -> CategoryRepository<'_> {
        CategoryRepository::new(&self.inner.pool)
    }

    #[must_use]
    pub fn orders(&self) -> OrderRepository<'_> {
        OrderRepository::new(&self.inner.pool)
    }

    #[must_use]
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.inner.pool)
    }

    #[must_use]
    pub fn analytics(&self) -> AnalyticsRepository<'_> {
        AnalyticsRepository::new(&self.inner.pool)
    }
}
