//! Sales figures for the analytics page.

use rust_decimal::Decimal;
use sqlx::PgPool;

use aiza_tasty_core::{Price, ProductId};

use super::RepositoryError;

/// How many best sellers the analytics page lists.
pub const TOP_PRODUCT_LIMIT: i64 = 5;

/// Overall sales numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesSummary {
    /// Sum of every order total; zero when there are no orders.
    pub total_sales: Price,
    pub order_count: i64,
    pub top_products: Vec<TopProduct>,
}

/// A product and how many order lines reference it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TopProduct {
    pub id: ProductId,
    pub name: String,
    pub order_count: i64,
}

#[derive(sqlx::FromRow)]
struct TotalsRow {
    total_sales: Decimal,
    order_count: i64,
}

/// Repository for aggregate sales queries.
#[derive(Clone, Copy)]
pub struct AnalyticsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnalyticsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Total sales, order count and the five most-ordered products.
    ///
    /// Products are ranked by the number of order lines that reference
    /// them; ties go to the lower product id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn summary(&self) -> Result<SalesSummary, RepositoryError> {
        let totals: TotalsRow = sqlx::query_as(
            "SELECT COALESCE(SUM(total_price), 0) AS total_sales, COUNT(*) AS order_count \
             FROM customer_order",
        )
        .fetch_one(self.pool)
        .await?;

        let top_products: Vec<TopProduct> = sqlx::query_as(
            "SELECT p.id, p.name, COUNT(oi.id) AS order_count \
             FROM product p LEFT JOIN order_item oi ON oi.product_id = p.id \
             GROUP BY p.id, p.name \
             ORDER BY order_count DESC, p.id ASC \
             LIMIT $1",
        )
        .bind(TOP_PRODUCT_LIMIT)
        .fetch_all(self.pool)
        .await?;

        let total_sales = Price::new(totals.total_sales)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid sales total: {e}")))?;

        Ok(SalesSummary {
            total_sales,
            order_count: totals.order_count,
            top_products,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../storefront/migrations")]
    async fn test_summary_without_orders(pool: PgPool) {
        let summary = AnalyticsRepository::new(&pool).summary().await.unwrap();

        assert_eq!(summary.total_sales, Price::ZERO);
        assert_eq!(summary.order_count, 0);
        assert!(summary.top_products.is_empty());
    }
}
