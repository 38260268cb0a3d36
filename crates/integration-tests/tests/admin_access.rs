//! Admin capability checks and export, driven in-process.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    extract::Path,
    http::{StatusCode, header},
    routing::get,
};
use futures::{StreamExt, stream};
use tower_sessions::Session;

use aiza_tasty_admin::db::RepositoryError;
use aiza_tasty_admin::middleware::set_current_staff;
use aiza_tasty_admin::models::CurrentStaff;
use aiza_tasty_admin::routes::export::csv_rows;
use aiza_tasty_admin::routes::products::parse_ids;
use aiza_tasty_core::testing::product;
use aiza_tasty_core::{Product, ProductId, UserId};
use aiza_tasty_integration_tests::{admin, request, send, session_cookie};

/// Stands in for the login form: signs the session in as user `id`.
async fn sign_in(Path((id, superuser)): Path<(i32, bool)>, session: Session) -> StatusCode {
    let staff = CurrentStaff {
        id: UserId::new(id),
        username: format!("staff{id}"),
        is_staff: true,
        is_superuser: superuser,
    };
    set_current_staff(&session, &staff).await.unwrap();
    StatusCode::NO_CONTENT
}

fn app() -> Router {
    admin(Router::new().route("/test/sign-in/{id}/{superuser}", get(sign_in)))
}

async fn signed_in(app: &Router, id: i32, superuser: bool) -> String {
    let response = send(
        app,
        request("GET", &format!("/test/sign-in/{id}/{superuser}"), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    session_cookie(&response)
}

#[tokio::test]
async fn test_anonymous_requests_go_to_login() {
    let app = app();
    for (method, uri) in [
        ("GET", "/myadmin"),
        ("GET", "/myadmin/export"),
        ("GET", "/myadmin/notifications"),
        ("GET", "/edit-category/1"),
        ("POST", "/myadmin/delete_user/2"),
    ] {
        let response = send(&app, request(method, uri, None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{method} {uri}");
        assert_eq!(response.headers()[header::LOCATION], "/auth/login");
    }
}

#[tokio::test]
async fn test_staff_cannot_delete_users() {
    let app = app();
    let cookie = signed_in(&app, 5, false).await;

    let response = send(&app, request("POST", "/myadmin/delete_user/9", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_superuser_cannot_delete_self() {
    let app = app();
    let cookie = signed_in(&app, 7, true).await;

    let response = send(&app, request("POST", "/myadmin/delete_user/7", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_export_has_header_plus_one_row_per_product() {
    let products: Vec<Result<Product, RepositoryError>> = (1..=5)
        .map(|id| Ok(product(id, &format!("Cookie {id}"), 250)))
        .collect();

    let chunks: Vec<_> = csv_rows(stream::iter(products)).collect().await;
    let text: String = chunks
        .into_iter()
        .map(|chunk| String::from_utf8(chunk.unwrap().to_vec()).unwrap())
        .collect();

    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0], "ID,Name,Price,Category");
    assert_eq!(rows[5], "5,Cookie 5,2.50,Pastries");
}

#[test]
fn test_bulk_delete_ids_skip_unparsable_values() {
    let fields = vec![
        ("product_ids".to_string(), "4".to_string()),
        ("product_ids".to_string(), "four".to_string()),
        ("product_ids".to_string(), "2".to_string()),
    ];
    assert_eq!(parse_ids(&fields), vec![ProductId::new(2), ProductId::new(4)]);
}
