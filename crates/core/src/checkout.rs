//! Turning a cart into a persisted order.
//!
//! [`Checkout::finalize`] resolves the cart against current prices, inserts
//! the order and its items in one unit of work, clears the cart and sends a
//! confirmation to the customer. The order is committed before the
//! confirmation is attempted: a delivery failure is reported to the caller
//! but never rolls the order back.

use std::future::Future;

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::cart::CartLedger;
use crate::order::{Order, OrderDraft, PlacedOrder};
use crate::store::{CatalogStore, OrderStore, StoreError};
use crate::types::{Email, EmailError};
use crate::validation::FieldErrors;

const NAME_MAX: usize = 100;
const PHONE_MAX: usize = 20;

/// The raw checkout form as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl ContactForm {
    /// Check every field, collecting all problems at once.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is missing or invalid.
    pub fn validate(&self) -> Result<ContactDetails, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&mut errors, "name", &self.name, NAME_MAX);
        let phone = required(&mut errors, "phone", &self.phone, PHONE_MAX);
        let address = required(&mut errors, "address", &self.address, usize::MAX);

        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(EmailError::Empty) => {
                errors.add("email", "This field is required.");
                None
            }
            Err(err) => {
                errors.add("email", err.to_string());
                None
            }
        };

        match (name, email, phone, address) {
            (Some(name), Some(email), Some(phone), Some(address)) if errors.is_empty() => {
                Ok(ContactDetails {
                    name,
                    email,
                    phone,
                    address,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required(errors: &mut FieldErrors, field: &'static str, raw: &str, max: usize) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        errors.add(field, "This field is required.");
        return None;
    }
    if value.chars().count() > max {
        errors.add(field, format!("Ensure this value has at most {max} characters."));
        return None;
    }
    Some(value.to_owned())
}

/// Validated customer contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
}

/// A plain-text message to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    /// Sender mailbox, e.g. `Aiza Tasty <orders@aizatasty.com>`.
    pub from: String,
    pub to: Vec<Email>,
}

/// A notification could not be delivered.
#[derive(Debug, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotificationError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

/// Outbound message delivery.
pub trait Notifier: Send + Sync {
    fn send(
        &self,
        notification: &Notification,
    ) -> impl Future<Output = Result<(), NotificationError>> + Send;
}

/// Errors that can occur while finalizing a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Reading the catalog or writing the order failed; nothing was saved.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The order was saved and the cart cleared, but the confirmation
    /// could not be sent.
    #[error("order {} placed but confirmation failed: {source}", .order.order.id)]
    NotificationDelivery {
        order: Box<PlacedOrder>,
        #[source]
        source: NotificationError,
    },
}

/// Checkout orchestration over its collaborators.
pub struct Checkout<'a, C, O, N> {
    catalog: &'a C,
    orders: &'a O,
    notifier: &'a N,
    from_address: &'a str,
}

impl<'a, C, O, N> Checkout<'a, C, O, N>
where
    C: CatalogStore,
    O: OrderStore,
    N: Notifier,
{
    #[must_use]
    pub fn new(catalog: &'a C, orders: &'a O, notifier: &'a N, from_address: &'a str) -> Self {
        Self {
            catalog,
            orders,
            notifier,
            from_address,
        }
    }

    /// Place an order for everything in `cart`.
    ///
    /// An empty cart still produces an order with a zero total and no items.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Store`] if nothing was saved; the cart is
    /// untouched in that case. Returns [`CheckoutError::NotificationDelivery`]
    /// if the order was saved but the confirmation failed.
    #[instrument(skip(self, cart, contact), fields(items = cart.total_items()))]
    pub async fn finalize(
        &self,
        cart: &mut CartLedger,
        contact: ContactDetails,
    ) -> Result<PlacedOrder, CheckoutError> {
        let snapshot = cart.snapshot(self.catalog).await?;
        let draft = OrderDraft::new(contact, &snapshot);
        let placed = self.orders.create_order(&draft).await?;

        cart.clear();
        tracing::info!(
            order_id = %placed.order.id,
            total = %placed.order.total_price,
            lines = placed.items.len(),
            "order placed"
        );

        let notification = confirmation(&placed.order, self.from_address);
        if let Err(source) = self.notifier.send(&notification).await {
            tracing::error!(order_id = %placed.order.id, error = %source, "order confirmation failed");
            return Err(CheckoutError::NotificationDelivery {
                order: Box::new(placed),
                source,
            });
        }

        Ok(placed)
    }
}

/// Build the confirmation message for a placed order.
#[must_use]
pub fn confirmation(order: &Order, from: &str) -> Notification {
    let body = format!(
        "Hello {name},\n\
         \n\
         Thank you for your order at Aiza Tasty Pastries!\n\
         \n\
         Order ID: {id}\n\
         Total: {total}\n\
         \n\
         We will contact you soon to confirm delivery.\n\
         \n\
         Best regards,\n\
         Aiza Tasty Pastries\n",
        name = order.name,
        id = order.id,
        total = order.total_price,
    );

    Notification {
        subject: format!("Order Confirmation - Aiza Tasty Pastries (#{})", order.id),
        body,
        from: from.to_owned(),
        to: vec![order.email.clone()],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::testing::{InMemoryCatalog, InMemoryOrders, RecordingNotifier, product};
    use crate::types::{Price, ProductId};

    const FROM: &str = "orders@aizatasty.com";

    fn form() -> ContactForm {
        ContactForm {
            name: "Aiza".to_owned(),
            email: "aiza@example.com".to_owned(),
            phone: "0300 1234567".to_owned(),
            address: "12 Baker Street".to_owned(),
        }
    }

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::with_products([product(1, "Chocolate Cake", 500), product(2, "Croissant", 300)])
    }

    fn cart(entries: &[(i32, u32)]) -> CartLedger {
        CartLedger::from(
            entries
                .iter()
                .map(|(id, quantity)| (ProductId::new(*id), *quantity))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        let details = form().validate().unwrap();
        assert_eq!(details.name, "Aiza");
        assert_eq!(details.email.as_str(), "aiza@example.com");
    }

    #[test]
    fn test_validate_collects_every_error() {
        let errors = ContactForm {
            name: String::new(),
            email: "not-an-email".to_owned(),
            phone: "1".repeat(21),
            address: "  ".to_owned(),
        }
        .validate()
        .unwrap_err();

        assert!(errors.get("name").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("phone").unwrap().contains("20"));
        assert!(errors.get("address").is_some());
    }

    #[tokio::test]
    async fn test_finalize_snapshots_prices_and_clears_cart() {
        let catalog = catalog();
        let orders = InMemoryOrders::default();
        let notifier = RecordingNotifier::default();
        let mut ledger = cart(&[(1, 2), (2, 1)]);

        let placed = Checkout::new(&catalog, &orders, &notifier, FROM)
            .finalize(&mut ledger, form().validate().unwrap())
            .await
            .unwrap();

        assert_eq!(placed.order.total_price, Price::from_cents(1300));
        assert_eq!(placed.items.len(), 2);
        let item_sum: Price = placed.items.iter().map(|item| item.subtotal()).sum();
        assert_eq!(item_sum, placed.order.total_price);
        assert!(ledger.is_empty());

        // later price changes leave the order alone
        catalog.set_price(ProductId::new(1), Price::from_cents(900));
        let stored = orders.get(placed.order.id).unwrap();
        assert_eq!(stored.items[0].price, Price::from_cents(500));

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].subject,
            format!("Order Confirmation - Aiza Tasty Pastries (#{})", placed.order.id)
        );
        assert!(sent[0].body.contains("Total: $13.00"));
        assert_eq!(sent[0].to[0].as_str(), "aiza@example.com");
        assert_eq!(sent[0].from, FROM);
    }

    #[tokio::test]
    async fn test_finalize_empty_cart_places_zero_order() {
        let catalog = catalog();
        let orders = InMemoryOrders::default();
        let notifier = RecordingNotifier::default();
        let mut ledger = CartLedger::new();

        let placed = Checkout::new(&catalog, &orders, &notifier, FROM)
            .finalize(&mut ledger, form().validate().unwrap())
            .await
            .unwrap();

        assert_eq!(placed.order.total_price, Price::ZERO);
        assert!(placed.items.is_empty());
    }

    #[tokio::test]
    async fn test_finalize_skips_deleted_products() {
        let catalog = catalog();
        let orders = InMemoryOrders::default();
        let notifier = RecordingNotifier::default();
        let mut ledger = cart(&[(2, 3), (77, 1)]);

        let placed = Checkout::new(&catalog, &orders, &notifier, FROM)
            .finalize(&mut ledger, form().validate().unwrap())
            .await
            .unwrap();

        assert_eq!(placed.items.len(), 1);
        assert_eq!(placed.order.total_price, Price::from_cents(900));
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_order() {
        let catalog = catalog();
        let orders = InMemoryOrders::default();
        let notifier = RecordingNotifier::failing();
        let mut ledger = cart(&[(1, 1)]);

        let err = Checkout::new(&catalog, &orders, &notifier, FROM)
            .finalize(&mut ledger, form().validate().unwrap())
            .await
            .unwrap_err();

        let CheckoutError::NotificationDelivery { order, .. } = err else {
            panic!("expected notification failure");
        };
        assert!(orders.get(order.order.id).is_some());
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_leaves_cart() {
        let catalog = catalog();
        let orders = InMemoryOrders::failing();
        let notifier = RecordingNotifier::default();
        let mut ledger = cart(&[(1, 1)]);

        let err = Checkout::new(&catalog, &orders, &notifier, FROM)
            .finalize(&mut ledger, form().validate().unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Store(_)));
        assert_eq!(ledger.quantity(ProductId::new(1)), Some(1));
        assert!(notifier.sent().is_empty());
    }
}
