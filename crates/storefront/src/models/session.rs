//! Session-related types.
//!
//! The cart and wishlist live in the session next to the signed-in user.

use serde::{Deserialize, Serialize};

use aiza_tasty_core::{Grants, User, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Login name shown in the header.
    pub username: String,
    /// Capability flags at login time.
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl CurrentUser {
    /// Capability flags for authorization checks.
    #[must_use]
    pub const fn grants(&self) -> Grants {
        Grants {
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
        }
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the cart ledger (product id to quantity).
    pub const CART: &str = "cart";

    /// Key for the wishlist (ordered product ids).
    pub const WISHLIST: &str = "wishlist";
}
