//! Order management queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use aiza_tasty_core::{
    Email, Order, OrderId, OrderItem, OrderItemId, OrderStatus, PlacedOrder, Price, ProductId,
};

use super::RepositoryError;

const SELECT_ORDERS: &str = "\
    SELECT id, name, email, phone, address, total_price, status, created_at FROM customer_order";

#[derive(Debug, sqlx::FromRow)]
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
            RepositoryError::DataCorruption(format!("invalid email on order {}: {e}", row.id))
        })?;
        let total_price = Price::new(row.total_price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid total on order {}: {e}", row.id))
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

#[derive(Debug, sqlx::FromRow)]
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
            RepositoryError::DataCorruption(format!("negative quantity on item {}", row.id))
        })?;
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price on item {}: {e}", row.id))
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

/// Repository for order management.
#[derive(Clone, Copy)]
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> =
            sqlx::query_as(&format!("{SELECT_ORDERS} ORDER BY created_at DESC, id DESC"))
                .fetch_all(self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// An order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<PlacedOrder>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!("{SELECT_ORDERS} WHERE id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items: Vec<OrderItemRow> = sqlx::query_as(
            "SELECT id, order_id, product_id, product_name, quantity, price \
             FROM order_item WHERE order_id = $1 ORDER BY id",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(Some(PlacedOrder {
            order: row.try_into()?,
            items: items
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
        }))
    }

    /// Number of orders in `status`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_with_status(&self, status: OrderStatus) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customer_order WHERE status = $1")
            .bind(status)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order exists.
    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE customer_order SET status = $2 WHERE id = $1")
            .bind(id.as_i32())
            .bind(status)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
