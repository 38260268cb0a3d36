//! Core types for Aiza Tasty.
//!
//! Type-safe wrappers for ids, money, e-mail addresses and order statuses.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use status::OrderStatus;
