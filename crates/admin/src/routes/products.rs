//! Product editing, deletion, search and the image gallery.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use aiza_tasty_core::{Category, FieldErrors, Product, ProductId};

use super::dashboard::DASHBOARD_PATH;
use super::forms::{MultipartForm, ProductForm};
use crate::db::ProductInput;
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::models::CurrentStaff;
use crate::state::AppState;

/// Edit product page template.
#[derive(Template, WebTemplate)]
#[template(path = "edit_product.html")]
pub struct EditProductTemplate {
    pub staff: CurrentStaff,
    pub product: Product,
    pub categories: Vec<Category>,
    pub product_form: ProductForm,
    pub product_errors: FieldErrors,
}

/// Search results template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub staff: CurrentStaff,
    pub query: String,
    pub products: Vec<Product>,
}

/// Image gallery template.
#[derive(Template, WebTemplate)]
#[template(path = "gallery.html")]
pub struct GalleryTemplate {
    pub staff: CurrentStaff,
    pub products: Vec<Product>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Validate the product fields of `form` and store its image, if any.
///
/// The image is only written once every field is valid.
///
/// # Errors
///
/// The outer error is a storage failure; the inner one holds the messages
/// to show next to the form fields.
pub(super) async fn product_input(
    state: &AppState,
    form: &MultipartForm,
    categories: &[Category],
) -> Result<std::result::Result<ProductInput, FieldErrors>> {
    let validated = form.product().validate(categories);
    let image_error = form
        .image
        .as_ref()
        .and_then(|upload| upload.image_extension().err());

    let mut input = match (validated, image_error) {
        (Ok(input), None) => input,
        (Ok(_), Some(err)) => {
            let mut errors = FieldErrors::new();
            errors.add("image", err.to_string());
            return Ok(Err(errors));
        }
        (Err(mut errors), image_error) => {
            if let Some(err) = image_error {
                errors.add("image", err.to_string());
            }
            return Ok(Err(errors));
        }
    };

    if let Some(upload) = &form.image {
        let path = state
            .media()
            .save_product_image(upload)
            .await
            .map_err(AppError::from)?;
        tracing::debug!(%path, "product image stored");
        input.image = Some(path);
    }

    Ok(Ok(input))
}

async fn existing(state: &AppState, id: ProductId) -> Result<Product> {
    state
        .products()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Show the edit form for a product.
#[instrument(skip(state, staff), fields(staff = %staff.username))]
pub async fn edit_page(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Response> {
    let product = existing(&state, id).await?;
    Ok(EditProductTemplate {
        staff,
        product_form: ProductForm::from_product(&product),
        product,
        categories: state.categories().list().await?,
        product_errors: FieldErrors::new(),
    }
    .into_response())
}

/// Save an edited product. Without a new upload the current image stays.
#[instrument(skip(state, staff, multipart), fields(staff = %staff.username))]
pub async fn edit(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<Response> {
    let product = existing(&state, id).await?;
    let categories = state.categories().list().await?;
    let form = MultipartForm::read(multipart).await?;

    match product_input(&state, &form, &categories).await? {
        Ok(input) => {
            state.products().update(id, &input).await?;
            tracing::info!(product_id = %id, "product updated");
            Ok(Redirect::to(DASHBOARD_PATH).into_response())
        }
        Err(errors) => Ok(EditProductTemplate {
            staff,
            product,
            categories,
            product_form: form.product(),
            product_errors: errors,
        }
        .into_response()),
    }
}

/// Delete one product; unknown ids are a 404.
#[instrument(skip(state, staff), fields(staff = %staff.username))]
pub async fn delete(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Redirect> {
    if !state.products().delete(id).await? {
        return Err(AppError::NotFound(format!("product {id}")));
    }
    tracing::info!(product_id = %id, "product deleted");
    Ok(Redirect::to(DASHBOARD_PATH))
}

/// Delete every checked product in one statement.
#[instrument(skip_all, fields(staff = %staff.username))]
pub async fn bulk_delete(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Redirect> {
    let ids = parse_ids(&fields);
    if !ids.is_empty() {
        let deleted = state.products().delete_many(&ids).await?;
        tracing::info!(requested = ids.len(), deleted, "bulk product delete");
    }
    Ok(Redirect::to(DASHBOARD_PATH))
}

/// Collect the `product_ids` values, skipping anything that is not an id.
#[must_use]
pub fn parse_ids(fields: &[(String, String)]) -> Vec<ProductId> {
    let mut ids: Vec<ProductId> = fields
        .iter()
        .filter(|(key, _)| key == "product_ids")
        .filter_map(|(_, value)| value.parse().ok())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Products whose name contains `q`, ignoring case.
#[instrument(skip(state, staff), fields(staff = %staff.username))]
pub async fn search(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<SearchTemplate> {
    let products = state.products().search(query.q.trim()).await?;
    Ok(SearchTemplate {
        staff,
        query: query.q,
        products,
    })
}

/// Every product that has an uploaded image.
pub async fn gallery(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
) -> Result<GalleryTemplate> {
    Ok(GalleryTemplate {
        staff,
        products: state.products().with_images().await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn test_parse_ids_ignores_garbage() {
        let ids = parse_ids(&[
            field("product_ids", "3"),
            field("product_ids", "abc"),
            field("csrf", "7"),
            field("product_ids", " 1 "),
            field("product_ids", "3"),
        ]);
        assert_eq!(ids, vec![ProductId::new(1), ProductId::new(3)]);
    }

    #[test]
    fn test_parse_ids_empty() {
        assert!(parse_ids(&[]).is_empty());
    }
}
