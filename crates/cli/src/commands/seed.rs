//! Sample catalog for local development.
//!
//! Inserts a few categories with products, unless the catalog already has
//! categories.

use sqlx::PgPool;

use aiza_tasty_core::{CategoryId, Price};

use super::CommandError;

/// Categories and their products as `(name, price in cents)`.
const CATALOG: &[(&str, &[(&str, u32)])] = &[
    (
        "Cakes",
        &[
            ("Chocolate Fudge Cake", 2_500),
            ("Red Velvet Cake", 2_800),
            ("Lemon Drizzle Cake", 2_200),
            ("Carrot Cake", 2_400),
        ],
    ),
    (
        "Cookies",
        &[
            ("Chocolate Chip Cookie", 250),
            ("Oatmeal Raisin Cookie", 225),
            ("Double Chocolate Cookie", 275),
        ],
    ),
    (
        "Pastries",
        &[
            ("Butter Croissant", 300),
            ("Pain au Chocolat", 350),
            ("Cinnamon Roll", 375),
            ("Almond Danish", 400),
            ("Lemon Tart", 425),
            ("Apple Turnover", 325),
            ("Eclair", 450),
        ],
    ),
];

/// Insert the sample catalog in one transaction.
///
/// Returns the number of products inserted; zero when the catalog was
/// already populated.
///
/// # Errors
///
/// Returns an error if a query fails.
pub async fn catalog(pool: &PgPool) -> Result<usize, CommandError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM category")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::warn!(categories = existing, "Catalog already has categories, skipping seed");
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for (category, products) in CATALOG {
        let category_id: CategoryId =
            sqlx::query_scalar("INSERT INTO category (name) VALUES ($1) RETURNING id")
                .bind(*category)
                .fetch_one(&mut *tx)
                .await?;

        for (name, cents) in *products {
            sqlx::query("INSERT INTO product (name, price, category_id) VALUES ($1, $2, $3)")
                .bind(*name)
                .bind(Price::from_cents(*cents))
                .bind(category_id)
                .execute(&mut *tx)
                .await?;
            inserted += 1;
        }
        tracing::info!(%category, products = products.len(), "Seeded category");
    }

    tx.commit().await?;
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_fits_schema() {
        for (category, products) in CATALOG {
            assert!(category.len() <= 100);
            assert!(!products.is_empty());
            for (name, _) in *products {
                assert!(name.len() <= 200);
            }
        }
    }
}
