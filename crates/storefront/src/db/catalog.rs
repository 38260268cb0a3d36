//! Catalog queries: categories, products, listings and search.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;

use aiza_tasty_core::{
    CatalogStore, Category, CategoryId, Price, Product, ProductId, StoreError,
};

use super::{RepositoryError, like_pattern};

const PRODUCT_COLUMNS: &str = "\
    SELECT p.id, p.name, p.price, p.image, p.category_id, c.name AS category_name \
    FROM product p JOIN category c ON c.id = p.category_id";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    price: Decimal,
    image: Option<String>,
    category_id: i32,
    category_name: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            price,
            image: row.image,
            category_id: CategoryId::new(row.category_id),
            category_name: row.category_name,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
        }
    }
}

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
    rows.into_iter().map(Product::try_from).collect()
}

/// A category together with a preview of its products.
#[derive(Debug, Clone)]
pub struct CategoryPreview {
    pub category: Category,
    pub products: Vec<Product>,
}

/// Read-only repository over the catalog tables.
#[derive(Clone, Copy)]
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<CategoryRow> =
            sqlx::query_as("SELECT id, name FROM category ORDER BY name, id")
                .fetch_all(self.pool)
                .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Look up one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row: Option<CategoryRow> = sqlx::query_as("SELECT id, name FROM category WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Category::from))
    }

    /// Look up one product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!("{PRODUCT_COLUMNS} WHERE p.id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;
        row.map(Product::try_from).transpose()
    }

    /// Look up several products; unknown ids are left out.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let rows: Vec<ProductRow> =
            sqlx::query_as(&format!("{PRODUCT_COLUMNS} WHERE p.id = ANY($1) ORDER BY p.id"))
                .bind(ids)
                .fetch_all(self.pool)
                .await?;
        into_products(rows)
    }

    /// The most recently added products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> =
            sqlx::query_as(&format!("{PRODUCT_COLUMNS} ORDER BY p.id DESC LIMIT $1"))
                .bind(limit)
                .fetch_all(self.pool)
                .await?;
        into_products(rows)
    }

    /// Every category with up to `per_category` of its products.
    ///
    /// Categories without products are included with an empty preview.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn previews(&self, per_category: i64) -> Result<Vec<CategoryPreview>, RepositoryError> {
        let categories = self.categories().await?;
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, price, image, category_id, category_name FROM ( \
                 SELECT p.id, p.name, p.price, p.image, p.category_id, \
                        c.name AS category_name, \
                        ROW_NUMBER() OVER (PARTITION BY p.category_id ORDER BY p.id) AS slot \
                 FROM product p JOIN category c ON c.id = p.category_id \
             ) ranked \
             WHERE slot <= $1 \
             ORDER BY category_id, id",
        )
        .bind(per_category)
        .fetch_all(self.pool)
        .await?;
        let mut grouped: HashMap<CategoryId, Vec<Product>> = HashMap::new();
        for product in into_products(rows)? {
            grouped.entry(product.category_id).or_default().push(product);
        }

        Ok(categories
            .into_iter()
            .map(|category| CategoryPreview {
                products: grouped.remove(&category.id).unwrap_or_default(),
                category,
            })
            .collect())
    }

    /// Products whose name or category name contains `query`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "{PRODUCT_COLUMNS} WHERE p.name ILIKE $1 OR c.name ILIKE $1 ORDER BY p.id DESC"
        ))
        .bind(like_pattern(query))
        .fetch_all(self.pool)
        .await?;
        into_products(rows)
    }

    /// Number of products in a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_in_category(&self, id: CategoryId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE category_id = $1")
            .bind(id.as_i32())
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// One page of a category's products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn page_in_category(
        &self,
        id: CategoryId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "{PRODUCT_COLUMNS} WHERE p.category_id = $1 ORDER BY p.id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(id.as_i32())
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;
        into_products(rows)
    }
}

impl CatalogStore for CatalogRepository<'_> {
    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(Self::product(self, id).await?)
    }

    async fn products(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        Ok(Self::products(self, ids).await?)
    }
}
