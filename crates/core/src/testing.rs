//! In-memory collaborators for tests.
//!
//! Enabled for this crate's own tests and for dependents through the
//! `testing` feature.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::catalog::Product;
use crate::checkout::{Notification, NotificationError, Notifier};
use crate::order::{Order, OrderDraft, OrderItem, PlacedOrder};
use crate::store::{CatalogStore, OrderStore, StoreError};
use crate::types::{CategoryId, OrderId, OrderItemId, OrderStatus, Price, ProductId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build a product in a catch-all "Pastries" category.
#[must_use]
pub fn product(id: i32, name: &str, cents: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        price: Price::from_cents(cents),
        image: None,
        category_id: CategoryId::new(1),
        category_name: "Pastries".to_owned(),
    }
}

/// A catalog backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: Mutex<BTreeMap<ProductId, Product>>,
}

impl InMemoryCatalog {
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: Mutex::new(products.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    /// Change a product's price, as staff would from the dashboard.
    pub fn set_price(&self, id: ProductId, price: Price) {
        if let Some(product) = lock(&self.products).get_mut(&id) {
            product.price = price;
        }
    }

    /// Delete a product.
    pub fn remove(&self, id: ProductId) {
        lock(&self.products).remove(&id);
    }
}

impl CatalogStore for InMemoryCatalog {
    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(lock(&self.products).get(&id).cloned())
    }

    async fn products(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        let products = lock(&self.products);
        Ok(ids.iter().filter_map(|id| products.get(id).cloned()).collect())
    }
}

/// An order store that keeps placed orders in memory.
#[derive(Debug, Default)]
pub struct InMemoryOrders {
    orders: Mutex<Vec<PlacedOrder>>,
    fail: bool,
}

impl InMemoryOrders {
    /// A store whose writes always fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            orders: Mutex::default(),
            fail: true,
        }
    }

    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<PlacedOrder> {
        lock(&self.orders).iter().find(|placed| placed.order.id == id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.orders).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.orders).is_empty()
    }
}

impl OrderStore for InMemoryOrders {
    async fn create_order(&self, draft: &OrderDraft) -> Result<PlacedOrder, StoreError> {
        if self.fail {
            return Err(StoreError::Backend("order store unavailable".into()));
        }

        let mut orders = lock(&self.orders);
        let order_id = OrderId::new(i32::try_from(orders.len() + 1).unwrap_or(i32::MAX));
        let first_item = orders.iter().map(|placed| placed.items.len()).sum::<usize>() + 1;

        let items = draft
            .lines
            .iter()
            .enumerate()
            .map(|(offset, line)| OrderItem {
                id: OrderItemId::new(i32::try_from(first_item + offset).unwrap_or(i32::MAX)),
                order_id,
                product_id: Some(line.product_id),
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                price: line.price,
            })
            .collect();

        let placed = PlacedOrder {
            order: Order {
                id: order_id,
                name: draft.contact.name.clone(),
                email: draft.contact.email.clone(),
                phone: draft.contact.phone.clone(),
                address: draft.contact.address.clone(),
                total_price: draft.total(),
                status: OrderStatus::New,
                created_at: Utc::now(),
            },
            items,
        };
        orders.push(placed.clone());
        Ok(placed)
    }
}

/// A notifier that records what it was asked to send.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingNotifier {
    /// A notifier whose deliveries always fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    /// Everything delivered so far.
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        lock(&self.sent).clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        if self.fail {
            return Err(NotificationError("smtp connection refused".into()));
        }
        lock(&self.sent).push(notification.clone());
        Ok(())
    }
}
