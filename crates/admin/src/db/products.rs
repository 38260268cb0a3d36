//! Product management queries.

use futures::{Stream, TryStreamExt};
use rust_decimal::Decimal;
use sqlx::PgPool;

use aiza_tasty_core::{CategoryId, Price, Product, ProductId};

use super::{RepositoryError, like_pattern};

const SELECT_PRODUCTS: &str = "\
    SELECT p.id, p.name, p.price, p.image, p.category_id, c.name AS category_name \
    FROM product p JOIN category c ON c.id = p.category_id";

#[derive(Debug, sqlx::FromRow)]
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

/// Validated product fields from the add/edit forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub name: String,
    pub price: Price,
    pub category_id: CategoryId,
    /// Newly uploaded image path; `None` keeps the current image on update.
    pub image: Option<String>,
}

/// Repository for product management.
#[derive(Clone, Copy)]
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> =
            sqlx::query_as(&format!("{SELECT_PRODUCTS} ORDER BY p.id DESC"))
                .fetch_all(self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Stream every product in id order, for export.
    pub fn stream_all(&self) -> impl Stream<Item = Result<Product, RepositoryError>> + Send + 'a {
        const SQL: &str = "\
            SELECT p.id, p.name, p.price, p.image, p.category_id, c.name AS category_name \
            FROM product p JOIN category c ON c.id = p.category_id ORDER BY p.id";

        sqlx::query_as::<_, ProductRow>(SQL)
            .fetch(self.pool)
            .map_err(RepositoryError::from)
            .and_then(|row| async move { Product::try_from(row) })
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("{SELECT_PRODUCTS} WHERE p.id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Products whose name contains `query`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> =
            sqlx::query_as(&format!("{SELECT_PRODUCTS} WHERE p.name ILIKE $1 ORDER BY p.id DESC"))
                .bind(like_pattern(query))
                .fetch_all(self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Products that have an uploaded image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn with_images(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "{SELECT_PRODUCTS} WHERE p.image IS NOT NULL AND p.image <> '' ORDER BY p.id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Insert a product and return its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &ProductInput) -> Result<ProductId, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO product (name, price, image, category_id) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&input.name)
        .bind(input.price.amount())
        .bind(input.image.as_deref())
        .bind(input.category_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(ProductId::new(id))
    }

    /// Overwrite a product's fields, keeping the image unless a new one is given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product exists.
    pub async fn update(&self, id: ProductId, input: &ProductInput) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE product SET name = $2, price = $3, category_id = $4, \
             image = COALESCE($5, image) WHERE id = $1",
        )
        .bind(id.as_i32())
        .bind(&input.name)
        .bind(input.price.amount())
        .bind(input.category_id.as_i32())
        .bind(input.image.as_deref())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete one product. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every product whose id is in `ids`, in one statement.
    ///
    /// Ids that match nothing are ignored. Returns the number deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_many(&self, ids: &[ProductId]) -> Result<u64, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let raw: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let result = sqlx::query("DELETE FROM product WHERE id = ANY($1)")
            .bind(&raw)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::CategoryRepository;

    async fn seed(pool: &PgPool, name: &str) -> ProductId {
        let category_id = CategoryRepository::new(pool).create("Cakes").await.unwrap();
        ProductRepository::new(pool)
            .create(&ProductInput {
                name: name.to_string(),
                price: Price::from_cents(450),
                category_id,
                image: None,
            })
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "../storefront/migrations")]
    async fn test_delete_many_skips_unknown_ids(pool: PgPool) {
        let repo = ProductRepository::new(&pool);
        let carrot = seed(&pool, "Carrot Cake").await;
        let sponge = seed(&pool, "Sponge Cake").await;

        let deleted = repo
            .delete_many(&[carrot, ProductId::new(999)])
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        assert!(repo.get(carrot).await.unwrap().is_none());
        assert!(repo.get(sponge).await.unwrap().is_some());
    }

    #[sqlx::test(migrations = "../storefront/migrations")]
    async fn test_delete_many_empty_is_noop(pool: PgPool) {
        let cake = seed(&pool, "Honey Cake").await;
        let repo = ProductRepository::new(&pool);

        assert_eq!(repo.delete_many(&[]).await.unwrap(), 0);
        assert!(repo.get(cake).await.unwrap().is_some());
    }
}
