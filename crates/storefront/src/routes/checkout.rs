//! Checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use aiza_tasty_core::{
    CartLine, Checkout, CheckoutError, ContactForm, FieldErrors, Order, OrderItem, Price,
};

use super::Layout;
use crate::error::Result;
use crate::middleware::{OptionalAuth, ShopSession};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Checkout page template: contact form plus cart review.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    pub form: ContactForm,
    pub errors: FieldErrors,
    pub lines: Vec<CartLine>,
    pub total: Price,
}

/// Order confirmation page.
#[derive(Template, WebTemplate)]
#[template(path = "order_success.html")]
pub struct OrderSuccessTemplate {
    pub layout: Layout,
    pub order: Order,
    pub items: Vec<OrderItem>,
}

async fn render_form(
    state: &AppState,
    shop: &ShopSession,
    user: Option<CurrentUser>,
    form: ContactForm,
    errors: FieldErrors,
) -> Result<CheckoutTemplate> {
    let snapshot = shop.cart.snapshot(&state.catalog()).await?;

    Ok(CheckoutTemplate {
        layout: Layout::load(state, shop, user).await?,
        form,
        errors,
        total: snapshot.total(),
        lines: snapshot.lines().to_vec(),
    })
}

/// Display the checkout form.
#[instrument(skip(state, shop, user))]
pub async fn show(
    State(state): State<AppState>,
    shop: ShopSession,
    OptionalAuth(user): OptionalAuth,
) -> Result<impl IntoResponse> {
    render_form(&state, &shop, user, ContactForm::default(), FieldErrors::new()).await
}

/// Validate the contact details and place the order.
///
/// Invalid input re-renders the form with per-field messages. When the
/// confirmation e-mail fails the order stays placed and the cart stays
/// cleared, and the failure is returned to the visitor.
#[instrument(skip(state, shop, user, form))]
pub async fn place_order(
    State(state): State<AppState>,
    mut shop: ShopSession,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<ContactForm>,
) -> Result<Response> {
    let details = match form.validate() {
        Ok(details) => details,
        Err(errors) => {
            tracing::debug!(%errors, "checkout form rejected");
            return Ok(render_form(&state, &shop, user, form, errors)
                .await?
                .into_response());
        }
    };

    let catalog = state.catalog();
    let orders = state.orders();
    let email = state.email();
    let result = Checkout::new(&catalog, &orders, email, email.from_address())
        .finalize(&mut shop.cart, details)
        .await;

    match result {
        Ok(placed) => {
            shop.save_cart().await?;
            Ok(OrderSuccessTemplate {
                layout: Layout::load(&state, &shop, user).await?,
                order: placed.order,
                items: placed.items,
            }
            .into_response())
        }
        Err(err @ CheckoutError::NotificationDelivery { .. }) => {
            shop.save_cart().await?;
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}
