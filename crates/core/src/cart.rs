//! The per-session cart ledger.
//!
//! The ledger only stores product ids and quantities. Prices and names are
//! looked up from the [`CatalogStore`] whenever the cart is displayed or
//! checked out, so a price change is reflected until the moment of
//! purchase.
//!
//! Invariant: no entry is ever stored with a quantity of zero.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;
use crate::store::{CatalogStore, StoreError};
use crate::types::{Price, ProductId};

/// Errors from cart operations that consult the catalog.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The catalog could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Mapping of product id to quantity, stored in the session under `cart`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<ProductId, u32>",
    into = "BTreeMap<ProductId, u32>"
)]
pub struct CartLedger {
    lines: BTreeMap<ProductId, u32>,
}

impl From<BTreeMap<ProductId, u32>> for CartLedger {
    fn from(mut lines: BTreeMap<ProductId, u32>) -> Self {
        lines.retain(|_, quantity| *quantity > 0);
        Self { lines }
    }
}

impl From<CartLedger> for BTreeMap<ProductId, u32> {
    fn from(ledger: CartLedger) -> Self {
        ledger.lines
    }
}

impl CartLedger {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity held for `id`, if any.
    #[must_use]
    pub fn quantity(&self, id: ProductId) -> Option<u32> {
        self.lines.get(&id).copied()
    }

    /// `true` when the cart holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate `(product, quantity)` pairs in product id order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.lines.iter().map(|(id, quantity)| (*id, *quantity))
    }

    /// Sum of all quantities, including ids that no longer resolve.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.values().map(|quantity| u64::from(*quantity)).sum()
    }

    /// Add one unit of a product.
    ///
    /// Returns the new [`total_items`](Self::total_items).
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ProductNotFound`] if the product does not exist.
    pub async fn add<C: CatalogStore>(
        &mut self,
        catalog: &C,
        id: ProductId,
    ) -> Result<u64, CartError> {
        if catalog.product(id).await?.is_none() {
            return Err(CartError::ProductNotFound(id));
        }

        let quantity = self.lines.entry(id).or_insert(0);
        *quantity = quantity.saturating_add(1);
        Ok(self.total_items())
    }

    /// Drop a product from the cart. Returns whether it was present.
    pub fn remove(&mut self, id: ProductId) -> bool {
        self.lines.remove(&id).is_some()
    }

    /// Set the quantity of a product; zero or less removes it.
    ///
    /// Returns the recomputed line subtotal and cart total.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    pub async fn set_quantity<C: CatalogStore>(
        &mut self,
        catalog: &C,
        id: ProductId,
        quantity: i64,
    ) -> Result<QuantityChange, StoreError> {
        if quantity > 0 {
            self.lines
                .insert(id, u32::try_from(quantity).unwrap_or(u32::MAX));
        } else {
            self.lines.remove(&id);
        }

        let snapshot = self.snapshot(catalog).await?;
        Ok(QuantityChange {
            subtotal: snapshot.subtotal_of(id),
            total: snapshot.total(),
            total_items: self.total_items(),
        })
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Resolve every entry against the catalog.
    ///
    /// Ids that no longer resolve (the product was deleted after it was
    /// added) are skipped rather than reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    pub async fn snapshot<C: CatalogStore>(&self, catalog: &C) -> Result<CartSnapshot, StoreError> {
        if self.lines.is_empty() {
            return Ok(CartSnapshot::default());
        }

        let ids: Vec<ProductId> = self.lines.keys().copied().collect();
        let mut products: HashMap<ProductId, Product> = catalog
            .products(&ids)
            .await?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        let lines = self
            .iter()
            .filter_map(|(id, quantity)| {
                let Some(product) = products.remove(&id) else {
                    tracing::debug!(product_id = %id, "skipping stale cart entry");
                    return None;
                };
                Some(CartLine {
                    subtotal: product.price.times(quantity),
                    product,
                    quantity,
                })
            })
            .collect();

        Ok(CartSnapshot { lines })
    }
}

/// One resolved cart entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    pub subtotal: Price,
}

/// The cart resolved against the catalog at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    lines: Vec<CartLine>,
}

impl CartSnapshot {
    /// Resolved lines in product id order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// `true` when nothing resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(|line| line.subtotal).sum()
    }

    /// Sum of resolved quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Subtotal of one product, zero when it is not in the cart.
    #[must_use]
    pub fn subtotal_of(&self, id: ProductId) -> Price {
        self.lines
            .iter()
            .find(|line| line.product.id == id)
            .map_or(Price::ZERO, |line| line.subtotal)
    }
}

/// Result of [`CartLedger::set_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityChange {
    pub subtotal: Price,
    pub total: Price,
    pub total_items: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryCatalog, product};

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::with_products([
            product(1, "Chocolate Cake", 500),
            product(2, "Croissant", 300),
        ])
    }

    fn assert_no_empty_lines(cart: &CartLedger) {
        assert!(cart.iter().all(|(_, quantity)| quantity > 0));
    }

    #[tokio::test]
    async fn test_add_increments() {
        let catalog = catalog();
        let mut cart = CartLedger::new();

        assert_eq!(cart.add(&catalog, ProductId::new(1)).await.unwrap(), 1);
        assert_eq!(cart.add(&catalog, ProductId::new(1)).await.unwrap(), 2);
        assert_eq!(cart.add(&catalog, ProductId::new(2)).await.unwrap(), 3);
        assert_eq!(cart.quantity(ProductId::new(1)), Some(2));
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let catalog = catalog();
        let mut cart = CartLedger::new();

        let err = cart.add(&catalog, ProductId::new(99)).await.unwrap_err();
        assert!(matches!(err, CartError::ProductNotFound(id) if id == ProductId::new(99)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut cart = CartLedger::from(BTreeMap::from([(ProductId::new(1), 2)]));
        assert!(!cart.remove(ProductId::new(7)));
        assert!(cart.remove(ProductId::new(1)));
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_set_quantity_recomputes_totals() {
        let catalog = catalog();
        let mut cart = CartLedger::from(BTreeMap::from([
            (ProductId::new(1), 1),
            (ProductId::new(2), 1),
        ]));

        let change = cart.set_quantity(&catalog, ProductId::new(1), 3).await.unwrap();
        assert_eq!(change.subtotal, Price::from_cents(1500));
        assert_eq!(change.total, Price::from_cents(1800));
        assert_eq!(change.total_items, 4);
    }

    #[tokio::test]
    async fn test_set_quantity_zero_or_negative_removes() {
        let catalog = catalog();
        let mut cart = CartLedger::from(BTreeMap::from([
            (ProductId::new(1), 2),
            (ProductId::new(2), 1),
        ]));

        let change = cart.set_quantity(&catalog, ProductId::new(1), 0).await.unwrap();
        assert_eq!(cart.quantity(ProductId::new(1)), None);
        assert_eq!(change.subtotal, Price::ZERO);
        assert_eq!(change.total, Price::from_cents(300));

        cart.set_quantity(&catalog, ProductId::new(2), -4).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_quantities_stay_positive_across_operations() {
        let catalog = catalog();
        let mut cart = CartLedger::new();
        let p1 = ProductId::new(1);
        let p2 = ProductId::new(2);

        cart.add(&catalog, p1).await.unwrap();
        assert_no_empty_lines(&cart);
        cart.set_quantity(&catalog, p2, 5).await.unwrap();
        assert_no_empty_lines(&cart);
        cart.set_quantity(&catalog, p1, 0).await.unwrap();
        assert_no_empty_lines(&cart);
        cart.set_quantity(&catalog, p2, -1).await.unwrap();
        assert_no_empty_lines(&cart);
        cart.add(&catalog, p2).await.unwrap();
        cart.remove(p1);
        assert_no_empty_lines(&cart);
        assert_eq!(cart.quantity(p2), Some(1));
    }

    #[tokio::test]
    async fn test_snapshot_skips_stale_ids() {
        let catalog = catalog();
        let cart = CartLedger::from(BTreeMap::from([
            (ProductId::new(1), 2),
            (ProductId::new(42), 3),
        ]));

        let snapshot = cart.snapshot(&catalog).await.unwrap();
        assert_eq!(snapshot.lines().len(), 1);
        assert_eq!(snapshot.total(), Price::from_cents(1000));
        assert_eq!(snapshot.total_items(), 2);
        // the ledger itself still counts the stale entry
        assert_eq!(cart.total_items(), 5);
    }

    #[tokio::test]
    async fn test_total_follows_current_prices() {
        let catalog = catalog();
        let cart = CartLedger::from(BTreeMap::from([(ProductId::new(2), 2)]));

        catalog.set_price(ProductId::new(2), Price::from_cents(350));
        let snapshot = cart.snapshot(&catalog).await.unwrap();
        assert_eq!(snapshot.total(), Price::from_cents(700));
    }

    #[test]
    fn test_deserialize_drops_zero_quantities() {
        let cart: CartLedger = serde_json::from_str(r#"{"1":2,"2":0}"#).unwrap();
        assert_eq!(cart.quantity(ProductId::new(1)), Some(2));
        assert_eq!(cart.quantity(ProductId::new(2)), None);
        assert_eq!(serde_json::to_string(&cart).unwrap(), r#"{"1":2}"#);
    }
}
