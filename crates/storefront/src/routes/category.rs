//! Category listing with pagination.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State, rejection::PathRejection},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use aiza_tasty_core::{Category, CategoryId, Product};

use super::{Layout, path_id};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, ShopSession};
use crate::state::AppState;

/// Products per category page.
pub const PER_PAGE: i64 = 6;

/// Category page query parameters.
///
/// `page` stays a string so that garbage falls back to page 1 instead of
/// rejecting the request.
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub page: Option<String>,
}

/// A resolved page within a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub num_pages: i64,
}

impl Page {
    /// Resolve a requested page against the item count.
    ///
    /// Missing or non-numeric input gives the first page; anything past the
    /// end (or below 1) gives the last page. An empty listing still has one
    /// page.
    #[must_use]
    pub fn resolve(requested: Option<&str>, total: i64, per_page: i64) -> Self {
        let num_pages = if total <= 0 {
            1
        } else {
            (total + per_page - 1) / per_page
        };
        let number = match requested.map(str::trim).map(str::parse::<i64>) {
            None | Some(Err(_)) => 1,
            Some(Ok(n)) if (1..=num_pages).contains(&n) => n,
            Some(Ok(_)) => num_pages,
        };

        Self { number, num_pages }
    }

    /// Row offset of this page.
    #[must_use]
    pub const fn offset(&self, per_page: i64) -> i64 {
        (self.number - 1) * per_page
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    #[must_use]
    pub const fn previous(&self) -> i64 {
        self.number - 1
    }

    #[must_use]
    pub const fn next(&self) -> i64 {
        self.number + 1
    }
}

/// Category page template.
#[derive(Template, WebTemplate)]
#[template(path = "category.html")]
pub struct CategoryTemplate {
    pub layout: Layout,
    pub category: Category,
    pub products: Vec<Product>,
    pub page: Page,
}

/// Display one page of a category.
#[instrument(skip(state, shop, user, path))]
pub async fn show(
    State(state): State<AppState>,
    shop: ShopSession,
    OptionalAuth(user): OptionalAuth,
    path: std::result::Result<Path<CategoryId>, PathRejection>,
    Query(query): Query<CategoryQuery>,
) -> Result<impl IntoResponse> {
    let id = path_id(path)?;
    let catalog = state.catalog();
    let category = catalog
        .category(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;

    let total = catalog.count_in_category(id).await?;
    let page = Page::resolve(query.page.as_deref(), total, PER_PAGE);
    let products = catalog
        .page_in_category(id, PER_PAGE, page.offset(PER_PAGE))
        .await?;

    Ok(CategoryTemplate {
        layout: Layout::load(&state, &shop, user).await?,
        category,
        products,
        page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_garbage_page_is_first() {
        assert_eq!(Page::resolve(None, 20, PER_PAGE).number, 1);
        assert_eq!(Page::resolve(Some("abc"), 20, PER_PAGE).number, 1);
        assert_eq!(Page::resolve(Some(""), 20, PER_PAGE).number, 1);
    }

    #[test]
    fn test_out_of_range_page_is_last() {
        let page = Page::resolve(Some("99"), 20, PER_PAGE);
        assert_eq!(page.num_pages, 4);
        assert_eq!(page.number, 4);
        assert!(!page.has_next());

        assert_eq!(Page::resolve(Some("0"), 20, PER_PAGE).number, 4);
        assert_eq!(Page::resolve(Some("-2"), 20, PER_PAGE).number, 4);
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let page = Page::resolve(Some("3"), 0, PER_PAGE);
        assert_eq!(page, Page { number: 1, num_pages: 1 });
        assert_eq!(page.offset(PER_PAGE), 0);
    }

    #[test]
    fn test_navigation() {
        let page = Page::resolve(Some("2"), 13, PER_PAGE);
        assert_eq!(page.num_pages, 3);
        assert!(page.has_previous());
        assert!(page.has_next());
        assert_eq!(page.previous(), 1);
        assert_eq!(page.next(), 3);
        assert_eq!(page.offset(PER_PAGE), 6);
    }
}
