//! Capability checks for the admin surface.
//!
//! Every admin route requires [`Capability::Staff`]. Deleting user accounts
//! additionally requires [`Capability::Superuser`]. A superuser flag alone,
//! without the staff flag, does not open the admin.

use thiserror::Error;

/// A permission an admin route can demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Staff,
    Superuser,
}

/// The flags carried by a signed-in user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Grants {
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl Grants {
    /// Whether these grants satisfy `capability`.
    #[must_use]
    pub const fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::Staff => self.is_staff,
            Capability::Superuser => self.is_staff && self.is_superuser,
        }
    }
}

/// Why an authorization check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// Nobody is signed in.
    #[error("authentication required")]
    Anonymous,

    /// Signed in, but without the capability.
    #[error("missing capability: {0:?}")]
    Missing(Capability),
}

/// Check the current user's grants against `capability`.
///
/// # Errors
///
/// Returns [`AuthorizationError::Anonymous`] when `grants` is `None`, or
/// [`AuthorizationError::Missing`] when the flag is absent.
pub const fn authorize(grants: Option<&Grants>, capability: Capability) -> Result<(), AuthorizationError> {
    match grants {
        None => Err(AuthorizationError::Anonymous),
        Some(grants) if grants.allows(capability) => Ok(()),
        Some(_) => Err(AuthorizationError::Missing(capability)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOMER: Grants = Grants {
        is_staff: false,
        is_superuser: false,
    };
    const STAFF: Grants = Grants {
        is_staff: true,
        is_superuser: false,
    };
    const ADMIN: Grants = Grants {
        is_staff: true,
        is_superuser: true,
    };

    #[test]
    fn test_anonymous_is_rejected() {
        assert_eq!(
            authorize(None, Capability::Staff),
            Err(AuthorizationError::Anonymous)
        );
    }

    #[test]
    fn test_staff_capability() {
        assert_eq!(
            authorize(Some(&CUSTOMER), Capability::Staff),
            Err(AuthorizationError::Missing(Capability::Staff))
        );
        assert_eq!(authorize(Some(&STAFF), Capability::Staff), Ok(()));
        assert_eq!(authorize(Some(&ADMIN), Capability::Staff), Ok(()));
    }

    #[test]
    fn test_superuser_capability() {
        assert!(authorize(Some(&STAFF), Capability::Superuser).is_err());
        assert_eq!(authorize(Some(&ADMIN), Capability::Superuser), Ok(()));

        let superuser_only = Grants {
            is_staff: false,
            is_superuser: true,
        };
        assert!(!superuser_only.allows(Capability::Staff));
        assert!(!superuser_only.allows(Capability::Superuser));
    }
}
