//! Persistence collaborators used by the cart and checkout.
//!
//! The storefront implements these over `PostgreSQL`; tests use the
//! in-memory versions from [`crate::testing`].

use std::future::Future;

use thiserror::Error;

use crate::catalog::Product;
use crate::order::{OrderDraft, PlacedOrder};
use crate::types::ProductId;

/// Errors raised by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing database failed.
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A stored row could not be turned into a domain value.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// Read access to products.
pub trait CatalogStore: Send + Sync {
    /// Look up one product.
    fn product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, StoreError>> + Send;

    /// Look up several products at once. Unknown ids are left out of the
    /// result; order is unspecified.
    fn products(
        &self,
        ids: &[ProductId],
    ) -> impl Future<Output = Result<Vec<Product>, StoreError>> + Send;
}

/// Write access to orders.
pub trait OrderStore: Send + Sync {
    /// Insert the order and all of its lines atomically.
    fn create_order(
        &self,
        draft: &OrderDraft,
    ) -> impl Future<Output = Result<PlacedOrder, StoreError>> + Send;
}
