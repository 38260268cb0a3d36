//! Sales analytics and the new-order counter polled by the dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Json, extract::State};
use serde::Serialize;

use aiza_tasty_core::OrderStatus;

use crate::db::SalesSummary;
use crate::error::Result;
use crate::middleware::RequireStaff;
use crate::models::CurrentStaff;
use crate::state::AppState;

/// Analytics page template.
#[derive(Template, WebTemplate)]
#[template(path = "analytics.html")]
pub struct AnalyticsTemplate {
    pub staff: CurrentStaff,
    pub summary: SalesSummary,
}

/// Body of `/myadmin/notifications`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Notifications {
    pub new_orders: i64,
}

/// Total sales, order count and best sellers.
pub async fn analytics(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
) -> Result<AnalyticsTemplate> {
    Ok(AnalyticsTemplate {
        staff,
        summary: state.analytics().summary().await?,
    })
}

/// How many orders are still `new`.
pub async fn notifications(
    RequireStaff(_): RequireStaff,
    State(state): State<AppState>,
) -> Result<Json<Notifications>> {
    let new_orders = state.orders().count_with_status(OrderStatus::New).await?;
    Ok(Json(Notifications { new_orders }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_shape() {
        let body = serde_json::to_value(Notifications { new_orders: 3 }).unwrap();
        assert_eq!(body, serde_json::json!({ "new_orders": 3 }));
    }
}
