//! JWT validation and token extraction helpers

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::claims::SupabaseClaims;
use crate::config::SupabaseConfig;
use crate::error::AuthError;

/// Verify signature and expiry of a Supabase-issued JWT (HS256).
///
/// Audience and issuer are only checked when configured.
pub(crate) fn validate_jwt_token(
    token: &str,
    config: &SupabaseConfig,
) -> Result<SupabaseClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    // No clock tolerance: a token is rejected the second it expires
    validation.leeway = 0;

    if let Some(aud) = &config.audience {
        validation.set_audience(&[aud]);
    } else {
        validation.validate_aud = false;
    }

    if let Some(iss) = &config.issuer {
        validation.set_issuer(&[iss]);
    }

    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_ref());

    let token_data = decode::<SupabaseClaims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        AuthError::InvalidToken
    })?;

    Ok(token_data.claims)
}

/// Extract bearer token from the Authorization header.
///
/// A missing header, a non-bearer scheme, or an empty token all count as
/// no token. The scheme is matched case-insensitively.
pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header_str = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::TokenNotFound)?;

    let (scheme, token) = header_str
        .trim()
        .split_once(' ')
        .ok_or(AuthError::TokenNotFound)?;

    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::TokenNotFound);
    }

    Ok(token)
}
