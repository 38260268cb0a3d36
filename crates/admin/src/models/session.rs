//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

use aiza_tasty_core::{Grants, User, UserId};

/// Session-stored staff identity.
///
/// Minimal data stored in the session to identify the signed-in staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentStaff {
    /// Account's database ID.
    pub id: UserId,
    /// Login name shown in the header.
    pub username: String,
    /// Capability flags at login time.
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl CurrentStaff {
    /// Capability flags for authorization checks.
    #[must_use]
    pub const fn grants(&self) -> Grants {
        Grants {
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
        }
    }
}

impl From<&User> for CurrentStaff {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the signed-in staff member.
    pub const CURRENT_STAFF: &str = "current_staff";
}
