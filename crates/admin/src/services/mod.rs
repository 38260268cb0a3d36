//! Business services for the admin dashboard.

pub mod auth;
pub mod media;

pub use auth::{AuthError, AuthService};
pub use media::{MediaError, MediaStore, Upload};
