//! Axum extractors for authentication
//!
//! The gateway middleware has already validated the request by the time a
//! handler runs; extractors only read what it attached.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AuthError;
use crate::types::AuthUser;

/// Authenticated identity attached by the gateway.
///
/// Rejects with 401 when used on a route the gateway did not authenticate
/// (an unprotected endpoint, or a router built without the middleware).
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::TokenNotFound)
    }
}
