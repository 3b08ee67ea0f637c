//! Authentication and role guards
//!
//! Both guards are request-scoped and stateless; the gateway runs them in
//! fixed order (authentication, then roles).

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::error::AuthError;
use crate::jwt::extract_bearer_token;
use crate::policy::RequiredRoles;
use crate::provider::ProviderAdapter;
use crate::types::AuthUser;

/// Extracts the bearer token and delegates validation to the active adapter
#[derive(Clone)]
pub struct AuthenticationGuard {
    adapter: Arc<dyn ProviderAdapter>,
}

impl AuthenticationGuard {
    pub fn new(adapter: Arc<dyn ProviderAdapter>) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &Arc<dyn ProviderAdapter> {
        &self.adapter
    }

    /// The adapter is never invoked when no token is present.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        let token = extract_bearer_token(headers)?;
        self.adapter.validate_token(token).await
    }
}

/// Compares the authenticated role against an endpoint's required roles
pub struct RoleGuard;

impl RoleGuard {
    /// No identity is always forbidden; no required roles always allows.
    pub fn authorize(user: Option<&AuthUser>, required: &RequiredRoles) -> Result<(), AuthError> {
        let Some(user) = user else {
            return Err(AuthError::Forbidden);
        };

        if required.is_empty() || required.iter().any(|role| user.has_role(role)) {
            Ok(())
        } else {
            tracing::debug!(
                user_id = %user.id,
                roles = ?user.roles,
                required = ?required.iter().collect::<Vec<_>>(),
                "Role check failed"
            );
            Err(AuthError::Forbidden)
        }
    }
}
