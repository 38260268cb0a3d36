//! Storefront routes driven in-process.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use sqlx::PgPool;

use aiza_tasty_integration_tests::{form, json, request, send, storefront, storefront_with_pool};

#[tokio::test]
async fn test_health() {
    let app = storefront();
    let response = send(&app, request("GET", "/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_quantity_update_requires_post() {
    let app = storefront();
    let response = send(&app, request("GET", "/cart/update/1", None)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await, serde_json::json!({ "success": false }));
}

#[tokio::test]
async fn test_malformed_quantity_is_rejected() {
    let app = storefront();
    let response = send(&app, form("/cart/update/1", "quantity=lots")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await, serde_json::json!({ "success": false }));
}

#[tokio::test]
async fn test_non_numeric_product_is_not_found() {
    let app = storefront();

    for uri in ["/add-to-cart/abc", "/wishlist/add/abc", "/category/abc"] {
        let response = send(&app, request("GET", uri, None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    let response = send(&app, form("/cart/update/abc", "quantity=2")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../storefront/migrations")]
async fn test_quantity_defaults_to_one_without_body(pool: PgPool) {
    let category: i32 = sqlx::query_scalar("INSERT INTO category (name) VALUES ('Pies') RETURNING id")
        .fetch_one(&pool)
        .await
        .unwrap();
    let product: i32 = sqlx::query_scalar(
        "INSERT INTO product (name, price, category_id) VALUES ('Apple Pie', 6.50, $1) RETURNING id",
    )
    .bind(category)
    .fetch_one(&pool)
    .await
    .unwrap();

    let app = storefront_with_pool(pool);
    let uri = format!("/cart/update/{product}");
    let response = send(&app, request("POST", &uri, None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["total_items"], 1);
    assert_eq!(body["subtotal"].as_f64(), Some(6.5));
    assert_eq!(body["total"].as_f64(), Some(6.5));
}
