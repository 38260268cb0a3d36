//! Session-stored types for admin.

pub mod session;

pub use session::{CurrentStaff, keys as session_keys};
