//! Product and category forms posted from the dashboard.
//!
//! Product forms arrive as `multipart/form-data` because they may carry an
//! image; [`MultipartForm`] gathers the text fields and the optional file.

use std::collections::HashMap;

use axum::extract::Multipart;

use aiza_tasty_core::{Category, CategoryId, FieldErrors, Price, Product};

use crate::db::ProductInput;
use crate::error::Result;
use crate::services::Upload;

const PRODUCT_NAME_MAX: usize = 200;
const CATEGORY_NAME_MAX: usize = 100;
const REQUIRED: &str = "This field is required.";
const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// Text fields and the optional image of a multipart submission.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    pub image: Option<Upload>,
}

impl MultipartForm {
    /// Drain a multipart body. A file part without a name or content counts
    /// as no upload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a malformed body.
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    if name == "image" && !file_name.is_empty() && !bytes.is_empty() {
                        form.image = Some(Upload { file_name, bytes });
                    }
                }
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", String::as_str)
    }

    /// Whether the submit button `name` was part of the submission.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    #[must_use]
    pub fn product(&self) -> ProductForm {
        ProductForm {
            name: self.get("name").to_owned(),
            price: self.get("price").to_owned(),
            category: self.get("category").to_owned(),
        }
    }
}

/// Raw product fields, kept as typed for re-rendering.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub category: String,
}

impl ProductForm {
    /// Prefill from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.plain(),
            category: product.category_id.to_string(),
        }
    }

    /// Whether `category` is the currently selected option.
    #[must_use]
    pub fn selects(&self, category: &Category) -> bool {
        self.category.trim() == category.id.to_string()
    }

    /// Check every field against the available categories.
    ///
    /// The returned input has no image; the caller attaches the stored path.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self, categories: &[Category]) -> std::result::Result<ProductInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", REQUIRED);
        } else if name.chars().count() > PRODUCT_NAME_MAX {
            errors.add(
                "name",
                format!("Ensure this value has at most {PRODUCT_NAME_MAX} characters."),
            );
        }

        let price = Price::parse(&self.price)
            .map_err(|err| errors.add("price", capitalize(&err.to_string())))
            .ok();

        let category_id = match self.category.trim() {
            "" => {
                errors.add("category", REQUIRED);
                None
            }
            raw => raw
                .parse::<CategoryId>()
                .ok()
                .filter(|id| categories.iter().any(|category| category.id == *id))
                .or_else(|| {
                    errors.add("category", INVALID_CHOICE);
                    None
                }),
        };

        match (price, category_id) {
            (Some(price), Some(category_id)) if errors.is_empty() => Ok(ProductInput {
                name: name.to_owned(),
                price,
                category_id,
                image: None,
            }),
            _ => Err(errors),
        }
    }
}

/// Validate a category name.
///
/// # Errors
///
/// Returns the message for the `name` field.
pub fn validate_category_name(raw: &str) -> std::result::Result<String, FieldErrors> {
    let name = raw.trim();
    let mut errors = FieldErrors::new();
    if name.is_empty() {
        errors.add("name", REQUIRED);
    } else if name.chars().count() > CATEGORY_NAME_MAX {
        errors.add(
            "name",
            format!("Ensure this value has at most {CATEGORY_NAME_MAX} characters."),
        );
    }
    errors.into_result(name.to_owned())
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect::<String>() + "."
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: CategoryId::new(1),
                name: "Cakes".to_string(),
            },
            Category {
                id: CategoryId::new(2),
                name: "Cookies".to_string(),
            },
        ]
    }

    fn form(name: &str, price: &str, category: &str) -> ProductForm {
        ProductForm {
            name: name.to_string(),
            price: price.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_valid_product() {
        let input = form(" Lemon Tart ", "4.25", "2").validate(&categories()).unwrap();
        assert_eq!(input.name, "Lemon Tart");
        assert_eq!(input.price, Price::from_cents(425));
        assert_eq!(input.category_id, CategoryId::new(2));
        assert!(input.image.is_none());
    }

    #[test]
    fn test_unknown_category_is_invalid_choice() {
        let errors = form("Tart", "4", "9").validate(&categories()).unwrap_err();
        assert_eq!(errors.get("category"), Some(INVALID_CHOICE));

        let errors = form("Tart", "4", "cakes").validate(&categories()).unwrap_err();
        assert_eq!(errors.get("category"), Some(INVALID_CHOICE));
    }

    #[test]
    fn test_collects_all_product_errors() {
        let errors = form("", "-3", "").validate(&categories()).unwrap_err();
        assert_eq!(errors.get("name"), Some(REQUIRED));
        assert_eq!(errors.get("price"), Some("Price cannot be negative."));
        assert_eq!(errors.get("category"), Some(REQUIRED));
    }

    #[test]
    fn test_product_name_limit() {
        let errors = form(&"a".repeat(201), "1", "1")
            .validate(&categories())
            .unwrap_err();
        assert!(errors.get("name").unwrap().contains("200"));
        assert!(form(&"a".repeat(200), "1", "1").validate(&categories()).is_ok());
    }

    #[test]
    fn test_category_name() {
        assert_eq!(validate_category_name(" Breads ").unwrap(), "Breads");
        assert_eq!(
            validate_category_name("   ").unwrap_err().get("name"),
            Some(REQUIRED)
        );
        assert!(validate_category_name(&"b".repeat(101)).is_err());
    }

    #[test]
    fn test_selects() {
        let form = form("Tart", "1", "2");
        let cats = categories();
        assert!(!form.selects(&cats[0]));
        assert!(form.selects(&cats[1]));
    }
}
