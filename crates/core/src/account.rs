//! Site accounts shared by the storefront, the admin and the CLI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::authz::Grants;
use crate::types::{Email, UserId};

/// A registered user. Staff and superusers sign in to the admin with the
/// same account they use on the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Option<Email>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// The capability flags this account carries.
    #[must_use]
    pub const fn grants(&self) -> Grants {
        Grants {
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
        }
    }
}
