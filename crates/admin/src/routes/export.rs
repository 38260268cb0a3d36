//! Product CSV export.
//!
//! Rows are encoded one at a time as they arrive from the database, so the
//! download starts before the whole catalog has been read.

use std::io;

use async_stream::stream;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use futures::{Stream, StreamExt};
use tracing::instrument;

use aiza_tasty_core::Product;

use crate::db::{ProductRepository, RepositoryError};
use crate::middleware::RequireStaff;
use crate::state::AppState;

const HEADER: [&str; 4] = ["ID", "Name", "Price", "Category"];
const CONTENT_DISPOSITION: &str = "attachment; filename=\"products.csv\"";

/// Download every product as CSV.
#[instrument(skip_all, fields(staff = %staff.username))]
pub async fn export(RequireStaff(staff): RequireStaff, State(state): State<AppState>) -> Response {
    let pool = state.pool().clone();
    let body = stream! {
        let products = ProductRepository::new(&pool).stream_all();
        for await chunk in csv_rows(products) {
            yield chunk;
        }
    };

    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, CONTENT_DISPOSITION),
        ],
        Body::from_stream(body),
    )
        .into_response()
}

/// Encode a header row followed by one row per product.
///
/// A database error ends the stream with an error, which aborts the
/// response body.
pub fn csv_rows<S>(products: S) -> impl Stream<Item = Result<Bytes, io::Error>> + Send
where
    S: Stream<Item = Result<Product, RepositoryError>> + Send,
{
    stream! {
        let mut products = std::pin::pin!(products);
        yield encode_row(HEADER);

        while let Some(product) = products.next().await {
            match product {
                Ok(product) => yield encode_row(row(&product)),
                Err(err) => {
                    tracing::error!(error = %err, "product export aborted");
                    yield Err(io::Error::other(err));
                    break;
                }
            }
        }
    }
}

fn row(product: &Product) -> [String; 4] {
    [
        product.id.to_string(),
        product.name.clone(),
        product.price.plain(),
        product.category_name.clone(),
    ]
}

fn encode_row<I, T>(record: I) -> Result<Bytes, io::Error>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(record)?;
    writer
        .into_inner()
        .map(Bytes::from)
        .map_err(|err| err.into_error())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures::stream;

    use aiza_tasty_core::testing::product;

    use super::*;

    async fn collect(products: Vec<Result<Product, RepositoryError>>) -> (String, bool) {
        let chunks: Vec<_> = csv_rows(stream::iter(products)).collect().await;
        let failed = chunks.iter().any(Result::is_err);
        let text = chunks
            .into_iter()
            .filter_map(Result::ok)
            .map(|bytes| String::from_utf8(bytes.to_vec()).unwrap())
            .collect();
        (text, failed)
    }

    #[tokio::test]
    async fn test_one_row_per_product_after_header() {
        let (text, failed) = collect(vec![
            Ok(product(1, "Chocolate Cake", 500)),
            Ok(product(2, "Croissant", 300)),
            Ok(product(3, "Lemon Tart", 425)),
        ])
        .await;

        assert!(!failed);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "ID,Name,Price,Category");
        assert_eq!(lines[1], "1,Chocolate Cake,5.00,Pastries");
        assert_eq!(lines[3], "3,Lemon Tart,4.25,Pastries");
    }

    #[tokio::test]
    async fn test_empty_catalog_is_header_only() {
        let (text, _) = collect(Vec::new()).await;
        assert_eq!(text, "ID,Name,Price,Category\n");
    }

    #[tokio::test]
    async fn test_fields_are_quoted() {
        let (text, _) = collect(vec![Ok(product(7, "Cake, \"double\" layer", 1200))]).await;
        assert_eq!(
            text.lines().nth(1),
            Some("7,\"Cake, \"\"double\"\" layer\",12.00,Pastries")
        );
    }

    #[tokio::test]
    async fn test_database_error_ends_stream() {
        let (text, failed) = collect(vec![
            Ok(product(1, "Chocolate Cake", 500)),
            Err(RepositoryError::NotFound),
            Ok(product(2, "Croissant", 300)),
        ])
        .await;

        assert!(failed);
        assert_eq!(text.lines().count(), 2);
    }
}
