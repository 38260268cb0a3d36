//! Aiza Tasty Core - shared domain library.
//!
//! This crate holds the parts of the bakery shop that do not touch HTTP:
//! - `storefront` - public shop with cart, wishlist and checkout
//! - `admin` - staff dashboard for catalog, orders and users
//! - `cli` - migrations, seeding and account management
//!
//! # Architecture
//!
//! Cart, wishlist and checkout rules live here and talk to persistence
//! through the traits in [`store`] and to mail delivery through
//! [`checkout::Notifier`]. The `postgres` feature adds `sqlx` encodings
//! for the id and money types; the `testing` feature exposes in-memory
//! collaborators.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails and order statuses
//! - [`cart`] - Session cart ledger
//! - [`wishlist`] - Session wishlist set
//! - [`checkout`] - Checkout orchestration and contact validation
//! - [`authz`] - Staff/superuser capability checks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod authz;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;
pub mod store;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;
pub mod validation;
pub mod wishlist;

pub use account::User;
pub use authz::{AuthorizationError, Capability, Grants, authorize};
pub use cart::{CartError, CartLedger, CartLine, CartSnapshot, QuantityChange};
pub use catalog::{Category, Product};
pub use checkout::{
    Checkout, CheckoutError, ContactDetails, ContactForm, Notification, NotificationError,
    Notifier,
};
pub use order::{DraftLine, Order, OrderDraft, OrderItem, PlacedOrder};
pub use store::{CatalogStore, OrderStore, StoreError};
pub use types::*;
pub use validation::FieldErrors;
pub use wishlist::{Toggle, ToggleStatus, WishlistSet};
