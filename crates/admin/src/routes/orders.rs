//! Order list, order detail and status changes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use aiza_tasty_core::{Order, OrderId, OrderItem, OrderStatus};

use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::models::CurrentStaff;
use crate::state::AppState;

/// Order list template.
#[derive(Template, WebTemplate)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub staff: CurrentStaff,
    pub orders: Vec<Order>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "order_detail.html")]
pub struct OrderDetailTemplate {
    pub staff: CurrentStaff,
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub statuses: [OrderStatus; 4],
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: OrderStatus,
}

/// All orders, newest first.
pub async fn index(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
) -> Result<OrdersTemplate> {
    Ok(OrdersTemplate {
        staff,
        orders: state.orders().list().await?,
    })
}

/// One order with its line items.
#[instrument(skip(state, staff), fields(staff = %staff.username))]
pub async fn show(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<OrderDetailTemplate> {
    let placed = state
        .orders()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    Ok(OrderDetailTemplate {
        staff,
        order: placed.order,
        items: placed.items,
        statuses: OrderStatus::ALL,
    })
}

/// Move an order to another status.
#[instrument(skip(state, staff), fields(staff = %staff.username))]
pub async fn update_status(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    state.orders().set_status(id, form.status).await?;
    tracing::info!(order_id = %id, status = %form.status, "order status changed");
    Ok(Redirect::to(&format!("/myadmin/orders/{id}")))
}
