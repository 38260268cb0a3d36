//! Order persistence for checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use aiza_tasty_core::{
    Email, Order, OrderDraft, OrderId, OrderItem, OrderItemId, OrderStatus, OrderStore,
    PlacedOrder, Price, ProductId, StoreError,
};

use super::RepositoryError;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    name: String,
    email: String,
    phone: String,
    address: String,
    total_price: Decimal,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let total_price = Price::new(row.total_price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid total for order {}: {e}", row.id))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            name: row.name,
            email,
            phone: row.phone,
            address: row.address,
            total_price,
            status: row.status,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: Option<i32>,
    product_name: String,
    quantity: i32,
    price: Decimal,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!("invalid quantity for item {}", row.id))
        })?;
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for item {}: {e}", row.id))
        })?;

        Ok(Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: row.product_id.map(ProductId::new),
            product_name: row.product_name,
            quantity,
            price,
        })
    }
}

/// Repository that writes orders placed at checkout.
#[derive(Clone, Copy)]
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order header and its lines in one transaction.
    ///
    /// The stored `total_price` is the draft's line sum, so it always agrees
    /// with the items written alongside it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; nothing is
    /// written in that case.
    pub async fn create(&self, draft: &OrderDraft) -> Result<PlacedOrder, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: OrderRow = sqlx::query_as(
            r"
            INSERT INTO customer_order (name, email, phone, address, total_price, status)
            VALUES ($1, $2, $3, $4, $5, 'new')
            RETURNING id, name, email, phone, address, total_price, status, created_at
            ",
        )
        .bind(&draft.contact.name)
        .bind(draft.contact.email.as_str())
        .bind(&draft.contact.phone)
        .bind(&draft.contact.address)
        .bind(draft.total().amount())
        .fetch_one(&mut *tx)
        .await?;
        let order = Order::try_from(row)?;

        let mut items = Vec::with_capacity(draft.lines.len());
        for line in &draft.lines {
            let quantity = i32::try_from(line.quantity).map_err(|_| {
                RepositoryError::Conflict(format!("quantity {} is too large", line.quantity))
            })?;
            let row: OrderItemRow = sqlx::query_as(
                r"
                INSERT INTO order_item (order_id, product_id, product_name, quantity, price)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, order_id, product_id, product_name, quantity, price
                ",
            )
            .bind(order.id.as_i32())
            .bind(line.product_id.as_i32())
            .bind(&line.product_name)
            .bind(quantity)
            .bind(line.price.amount())
            .fetch_one(&mut *tx)
            .await?;
            items.push(OrderItem::try_from(row)?);
        }

        tx.commit().await?;

        Ok(PlacedOrder { order, items })
    }
}

impl OrderStore for OrderRepository<'_> {
    async fn create_order(&self, draft: &OrderDraft) -> Result<PlacedOrder, StoreError> {
        Ok(self.create(draft).await?)
    }
}
