//! Per-session cart extractor.
//!
//! The cart is stored in the session under [`session_keys::CART`] as a
//! serialized [`CartStore`]. A session without one starts with an empty cart.

use std::ops::{Deref, DerefMut};

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use preface_core::CartStore;

use crate::error::AppError;
use crate::models::session_keys;

/// The shopper's cart, loaded from the session.
///
/// Mutations are local until [`SessionCart::save`] writes the cart back.
///
/// # Example
///
/// ```rust,ignore
/// async fn clear(mut cart: SessionCart) -> Result<StatusCode> {
///     cart.clear();
///     cart.save().await?;
///     Ok(StatusCode::NO_CONTENT)
/// }
/// ```
pub struct SessionCart {
    session: Session,
    cart: CartStore,
}

impl SessionCart {
    /// Persist the cart to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn save(&self) -> Result<(), AppError> {
        self.session.insert(session_keys::CART, &self.cart).await?;
        Ok(())
    }
}

impl Deref for SessionCart {
    type Target = CartStore;

    fn deref(&self) -> &Self::Target {
        &self.cart
    }
}

impl DerefMut for SessionCart {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cart
    }
}

impl<S> FromRequestParts<S> for SessionCart
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

        let cart = session.get::<CartStore>(session_keys::CART).await?.unwrap_or_default();

        Ok(Self { session, cart })
    }
}
