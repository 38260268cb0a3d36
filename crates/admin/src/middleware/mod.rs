//! HTTP middleware stack for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Security headers (stricter CSP for admin)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Authorization is not a layer: each handler takes [`RequireStaff`] or
//! [`RequireSuperuser`].

pub mod auth;
pub mod security_headers;
pub mod session;

pub use auth::{RequireStaff, RequireSuperuser, clear_current_staff, set_current_staff};
pub use security_headers::security_header_layers;
pub use session::create_session_layer;
