//! Business logic services for storefront.
//!
//! - `auth` - Sign-up and password login
//! - `email` - SMTP delivery of order confirmations

pub mod auth;
pub mod email;

pub use auth::{AuthError, AuthService};
pub use email::{EmailError, EmailService};
