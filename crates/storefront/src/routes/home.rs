//! Home page and product search.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use aiza_tasty_core::Product;

use super::Layout;
use crate::db::catalog::CategoryPreview;
use crate::error::Result;
use crate::middleware::{OptionalAuth, ShopSession};
use crate::state::AppState;

/// Products shown per category on the home page.
const PREVIEW_PER_CATEGORY: i64 = 3;

/// Number of "featured" (latest) products.
const FEATURED_COUNT: i64 = 4;

/// Home page query parameters.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub q: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub previews: Vec<CategoryPreview>,
    pub featured: Vec<Product>,
}

/// Search results template.
#[derive(Template, WebTemplate)]
#[template(path = "search_results.html")]
pub struct SearchResultsTemplate {
    pub layout: Layout,
    pub query: String,
    pub results: Vec<Product>,
}

/// Display the home page, or search results when `q` is given.
#[instrument(skip(state, shop, user))]
pub async fn home(
    State(state): State<AppState>,
    shop: ShopSession,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<HomeQuery>,
) -> Result<Response> {
    let layout = Layout::load(&state, &shop, user).await?;
    let catalog = state.catalog();

    if let Some(q) = query.q.map(|q| q.trim().to_owned()).filter(|q| !q.is_empty()) {
        let results = catalog.search(&q).await?;
        tracing::debug!(query = %q, results = results.len(), "product search");
        return Ok(SearchResultsTemplate {
            layout,
            query: q,
            results,
        }
        .into_response());
    }

    Ok(HomeTemplate {
        layout,
        previews: catalog.previews(PREVIEW_PER_CATEGORY).await?,
        featured: catalog.latest(FEATURED_COUNT).await?,
    }
    .into_response())
}
