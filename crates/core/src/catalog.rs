//! Catalog entities: categories and the products filed under them.

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId};

/// A product category such as "Cakes" or "Cookies".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A product on sale.
///
/// The category name is carried alongside the id because nearly every
/// screen that lists products also shows which category they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Path of the uploaded image relative to the media root.
    pub image: Option<String>,
    pub category_id: CategoryId,
    pub category_name: String,
}

impl Product {
    /// Public URL of the product image, if one was uploaded.
    #[must_use]
    pub fn image_url(&self) -> Option<String> {
        self.image
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("/media/{}", path.trim_start_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(image: Option<&str>) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Lemon Tart".to_owned(),
            price: Price::from_cents(450),
            image: image.map(str::to_owned),
            category_id: CategoryId::new(1),
            category_name: "Tarts".to_owned(),
        }
    }

    #[test]
    fn test_image_url() {
        assert_eq!(
            product(Some("products/tart.jpg")).image_url().as_deref(),
            Some("/media/products/tart.jpg")
        );
        assert_eq!(product(Some("")).image_url(), None);
        assert_eq!(product(None).image_url(), None);
    }
}
