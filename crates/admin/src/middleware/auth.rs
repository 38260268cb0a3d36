//! Authorization extractors for admin route handlers.
//!
//! Every admin handler takes [`RequireStaff`] or [`RequireSuperuser`], so
//! the capability check runs before any other work.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use aiza_tasty_core::{AuthorizationError, Capability, authorize};

use crate::models::{CurrentStaff, session_keys};

/// Path of the admin login page.
pub const LOGIN_PATH: &str = "/auth/login";

/// Extractor that requires a signed-in staff member.
///
/// ```rust,ignore
/// async fn handler(RequireStaff(staff): RequireStaff) -> impl IntoResponse {
///     format!("Hello, {}!", staff.username)
/// }
/// ```
pub struct RequireStaff(pub CurrentStaff);

/// Extractor that requires a signed-in staff member who is also a superuser.
pub struct RequireSuperuser(pub CurrentStaff);

/// Why an admin request was turned away.
#[derive(Debug, PartialEq, Eq)]
pub enum AdminAuthRejection {
    /// Nobody is signed in.
    RedirectToLogin,
    /// Signed in without the needed capability.
    Forbidden(Capability),
}

impl From<AuthorizationError> for AdminAuthRejection {
    fn from(err: AuthorizationError) -> Self {
        match err {
            AuthorizationError::Anonymous => Self::RedirectToLogin,
            AuthorizationError::Missing(capability) => Self::Forbidden(capability),
        }
    }
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Forbidden(Capability::Staff) => {
                (StatusCode::FORBIDDEN, "Staff access required").into_response()
            }
            Self::Forbidden(Capability::Superuser) => (
                StatusCode::FORBIDDEN,
                "Only superusers can access this resource",
            )
                .into_response(),
        }
    }
}

async fn current_staff(parts: &Parts) -> Option<CurrentStaff> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentStaff>(session_keys::CURRENT_STAFF)
        .await
        .ok()
        .flatten()
}

/// Check `staff` against `capability` and hand it back on success.
///
/// # Errors
///
/// Returns the rejection matching the failed check.
pub fn check(
    staff: Option<CurrentStaff>,
    capability: Capability,
) -> Result<CurrentStaff, AdminAuthRejection> {
    let grants = staff.as_ref().map(CurrentStaff::grants);
    authorize(grants.as_ref(), capability)?;
    staff.ok_or(AdminAuthRejection::RedirectToLogin)
}

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        check(current_staff(parts).await, Capability::Staff).map(Self)
    }
}

impl<S> FromRequestParts<S> for RequireSuperuser
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        check(current_staff(parts).await, Capability::Superuser).map(Self)
    }
}

/// Store the signed-in staff member in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_staff(
    session: &Session,
    staff: &CurrentStaff,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_STAFF, staff).await
}

/// End the admin session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub async fn clear_current_staff(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
mod tests {
    use aiza_tasty_core::UserId;

    use super::*;

    fn staff(is_staff: bool, is_superuser: bool) -> CurrentStaff {
        CurrentStaff {
            id: UserId::new(1),
            username: "baker".to_string(),
            is_staff,
            is_superuser,
        }
    }

    #[test]
    fn test_anonymous_redirects_to_login() {
        assert_eq!(
            check(None, Capability::Staff).err(),
            Some(AdminAuthRejection::RedirectToLogin)
        );
        let response = AdminAuthRejection::RedirectToLogin.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], LOGIN_PATH);
    }

    #[test]
    fn test_customer_is_forbidden() {
        let rejection = check(Some(staff(false, false)), Capability::Staff).err();
        assert_eq!(rejection, Some(AdminAuthRejection::Forbidden(Capability::Staff)));
        assert_eq!(
            AdminAuthRejection::Forbidden(Capability::Staff)
                .into_response()
                .status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_superuser_capability() {
        assert!(check(Some(staff(true, false)), Capability::Staff).is_ok());
        assert_eq!(
            check(Some(staff(true, false)), Capability::Superuser).err(),
            Some(AdminAuthRejection::Forbidden(Capability::Superuser))
        );
        assert!(check(Some(staff(true, true)), Capability::Superuser).is_ok());
    }
}
