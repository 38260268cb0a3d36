//! Orders and their line items.
//!
//! An [`OrderDraft`] is what checkout hands to the [`OrderStore`]: its total
//! is derived from its lines, so the persisted `total_price` always equals
//! the sum of the persisted item subtotals.
//!
//! [`OrderStore`]: crate::store::OrderStore

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartSnapshot;
use crate::checkout::ContactDetails;
use crate::types::{Email, OrderId, OrderItemId, OrderStatus, Price, ProductId};

/// A persisted order header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub total_price: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A persisted order line.
///
/// `price` is the unit price at the moment of purchase and never follows
/// later catalog changes. `product_id` becomes `None` if the product is
/// deleted; `product_name` keeps the line readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub quantity: u32,
    pub price: Price,
}

impl OrderItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// An order together with the items created for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// A line of an order that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    /// Snapshot of the product price when the draft was built.
    pub price: Price,
}

impl DraftLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Everything needed to insert an order and its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub contact: ContactDetails,
    pub lines: Vec<DraftLine>,
}

impl OrderDraft {
    /// Snapshot the resolved cart into draft lines.
    #[must_use]
    pub fn new(contact: ContactDetails, cart: &CartSnapshot) -> Self {
        let lines = cart
            .lines()
            .iter()
            .map(|line| DraftLine {
                product_id: line.product.id,
                product_name: line.product.name.clone(),
                quantity: line.quantity,
                price: line.product.price,
            })
            .collect();

        Self { contact, lines }
    }

    /// Sum of the line subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(DraftLine::subtotal).sum()
    }
}
