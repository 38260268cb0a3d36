//! Cart, wishlist and checkout behaviour across the core types.

#![allow(clippy::unwrap_used)]

use aiza_tasty_core::testing::{InMemoryCatalog, InMemoryOrders, RecordingNotifier, product};
use aiza_tasty_core::{
    CartError, CartLedger, Checkout, CheckoutError, ContactForm, Price, ProductId, ToggleStatus,
    WishlistSet,
};

const FROM: &str = "Aiza Tasty Pastries <orders@aizatasty.test>";

fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::with_products([
        product(1, "Chocolate Cake", 500),
        product(2, "Croissant", 300),
        product(3, "Lemon Tart", 425),
    ])
}

fn contact() -> ContactForm {
    ContactForm {
        name: "Aiza".to_string(),
        email: "aiza@example.com".to_string(),
        phone: "0300 1234567".to_string(),
        address: "12 Baker Street".to_string(),
    }
}

#[tokio::test]
async fn test_cart_counts_follow_every_change() {
    let catalog = catalog();
    let mut cart = CartLedger::new();

    assert_eq!(cart.add(&catalog, ProductId::new(1)).await.unwrap(), 1);
    assert_eq!(cart.add(&catalog, ProductId::new(1)).await.unwrap(), 2);
    assert_eq!(cart.add(&catalog, ProductId::new(2)).await.unwrap(), 3);

    let change = cart
        .set_quantity(&catalog, ProductId::new(2), 4)
        .await
        .unwrap();
    assert_eq!(change.subtotal, Price::from_cents(1200));
    assert_eq!(change.total, Price::from_cents(2200));
    assert_eq!(change.total_items, 6);

    let change = cart
        .set_quantity(&catalog, ProductId::new(1), 0)
        .await
        .unwrap();
    assert_eq!(change.subtotal, Price::ZERO);
    assert_eq!(cart.quantity(ProductId::new(1)), None);

    assert!(cart.remove(ProductId::new(2)));
    assert!(!cart.remove(ProductId::new(2)));
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_adding_unknown_product_leaves_cart_alone() {
    let catalog = catalog();
    let mut cart = CartLedger::new();
    cart.add(&catalog, ProductId::new(3)).await.unwrap();

    let err = cart.add(&catalog, ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, CartError::ProductNotFound(id) if id == ProductId::new(99)));
    assert_eq!(cart.total_items(), 1);
}

#[tokio::test]
async fn test_snapshot_total_is_sum_of_lines() {
    let catalog = catalog();
    let mut cart = CartLedger::new();
    for id in [1, 2, 2, 3, 3, 3] {
        cart.add(&catalog, ProductId::new(id)).await.unwrap();
    }

    let snapshot = cart.snapshot(&catalog).await.unwrap();
    let sum: Price = snapshot.lines().iter().map(|line| line.subtotal).sum();
    assert_eq!(snapshot.total(), sum);
    assert_eq!(snapshot.total(), Price::from_cents(500 + 600 + 1275));
    assert_eq!(snapshot.total_items(), cart.total_items());
}

#[tokio::test]
async fn test_deleted_product_drops_out_of_cart_view() {
    let catalog = catalog();
    let mut cart = CartLedger::new();
    cart.add(&catalog, ProductId::new(1)).await.unwrap();
    cart.add(&catalog, ProductId::new(2)).await.unwrap();

    catalog.remove(ProductId::new(1));
    let snapshot = cart.snapshot(&catalog).await.unwrap();
    assert_eq!(snapshot.lines().len(), 1);
    assert_eq!(snapshot.total(), Price::from_cents(300));
}

#[test]
fn test_wishlist_toggle_twice_is_a_no_op() {
    let mut wishlist = WishlistSet::new();
    wishlist.toggle(ProductId::new(2));
    let before = wishlist.clone();

    let first = wishlist.toggle(ProductId::new(5));
    assert_eq!(first.status, ToggleStatus::Added);
    assert_eq!(first.count, 2);

    let second = wishlist.toggle(ProductId::new(5));
    assert_eq!(second.status, ToggleStatus::Removed);
    assert_eq!(wishlist, before);
}

#[tokio::test]
async fn test_checkout_places_order_and_confirms() {
    let catalog = catalog();
    let orders = InMemoryOrders::default();
    let notifier = RecordingNotifier::default();
    let mut cart = CartLedger::new();
    cart.add(&catalog, ProductId::new(1)).await.unwrap();
    cart.add(&catalog, ProductId::new(1)).await.unwrap();
    cart.add(&catalog, ProductId::new(2)).await.unwrap();

    let placed = Checkout::new(&catalog, &orders, &notifier, FROM)
        .finalize(&mut cart, contact().validate().unwrap())
        .await
        .unwrap();

    assert_eq!(placed.order.total_price, Price::from_cents(1300));
    assert!(cart.is_empty());
    assert_eq!(orders.len(), 1);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains(&format!("Order ID: {}", placed.order.id)));
    assert!(sent[0].body.contains("Total: $13.00"));
}

#[tokio::test]
async fn test_checkout_with_empty_cart_still_creates_order() {
    let catalog = catalog();
    let orders = InMemoryOrders::default();
    let notifier = RecordingNotifier::default();

    let placed = Checkout::new(&catalog, &orders, &notifier, FROM)
        .finalize(&mut CartLedger::new(), contact().validate().unwrap())
        .await
        .unwrap();

    assert_eq!(placed.order.total_price, Price::ZERO);
    assert!(placed.items.is_empty());
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn test_failed_confirmation_keeps_order() {
    let catalog = catalog();
    let orders = InMemoryOrders::default();
    let notifier = RecordingNotifier::failing();
    let mut cart = CartLedger::new();
    cart.add(&catalog, ProductId::new(3)).await.unwrap();

    let err = Checkout::new(&catalog, &orders, &notifier, FROM)
        .finalize(&mut cart, contact().validate().unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::NotificationDelivery { .. }));
    assert_eq!(orders.len(), 1);
    assert!(cart.is_empty());
}

#[test]
fn test_invalid_contact_is_rejected_before_checkout() {
    let errors = ContactForm {
        email: "nope".to_string(),
        ..contact()
    }
    .validate()
    .unwrap_err();
    assert!(errors.get("email").is_some());
    assert!(errors.get("name").is_none());
}
