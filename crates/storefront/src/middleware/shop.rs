//! Per-request access to the session cart and wishlist.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use aiza_tasty_core::{CartLedger, WishlistSet};

use crate::error::AppError;
use crate::models::session_keys;

/// The visitor's cart and wishlist, loaded from the session.
///
/// Handlers mutate `cart` / `wishlist` and call [`ShopSession::save_cart`]
/// or [`ShopSession::save_wishlist`] to persist. Concurrent requests from
/// the same session are last-writer-wins.
pub struct ShopSession {
    session: Session,
    pub cart: CartLedger,
    pub wishlist: WishlistSet,
}

impl ShopSession {
    /// Load the cart and wishlist from an existing session handle.
    ///
    /// Malformed session values are treated as empty.
    pub async fn load(session: Session) -> Self {
        let cart = session
            .get::<CartLedger>(session_keys::CART)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding unreadable cart");
                None
            })
            .unwrap_or_default();
        let wishlist = session
            .get::<WishlistSet>(session_keys::WISHLIST)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding unreadable wishlist");
                None
            })
            .unwrap_or_default();

        Self {
            session,
            cart,
            wishlist,
        }
    }

    /// Write the cart back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn save_cart(&self) -> Result<(), AppError> {
        self.session.insert(session_keys::CART, &self.cart).await?;
        Ok(())
    }

    /// Write the wishlist back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn save_wishlist(&self) -> Result<(), AppError> {
        self.session
            .insert(session_keys::WISHLIST, &self.wishlist)
            .await?;
        Ok(())
    }

    /// Total quantity in the cart, for the header badge.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.cart.total_items()
    }

    /// Number of wishlisted products, for the header badge.
    #[must_use]
    pub fn wishlist_count(&self) -> usize {
        self.wishlist.len()
    }
}

impl<S> FromRequestParts<S> for ShopSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        Ok(Self::load(session).await)
    }
}
