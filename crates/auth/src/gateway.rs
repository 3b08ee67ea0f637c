//! Guard pipeline
//!
//! Built once at startup from the selected adapter and the endpoint
//! policies, then installed as a single axum middleware:
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/api/v1/health", get(health))
//!     .layer(axum::middleware::from_fn_with_state(gateway, gatekeeper_auth::guard));
//! ```
//!
//! Order is fixed: unprotected check, then `AuthenticationGuard`, then
//! `RoleGuard`. The middleware must be added with `Router::layer` (not
//! `route_layer` on an outer service) so `MatchedPath` is available.

use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AuthError;
use crate::guards::{AuthenticationGuard, RoleGuard};
use crate::policy::{Access, EndpointPolicies};
use crate::provider::ProviderAdapter;
use crate::types::{AuthProvider, AuthUser};

/// Per-request outcome of the guard pipeline. Never shared across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestAuthContext {
    /// Endpoint is unprotected; no identity was looked up
    Bypassed,
    /// Token valid and role requirement satisfied
    Authorized(AuthUser),
    /// Terminal rejection (401 or 403)
    Rejected(AuthError),
}

/// Shared, read-only gateway state
#[derive(Clone)]
pub struct Gateway {
    authentication: AuthenticationGuard,
    policies: Arc<EndpointPolicies>,
}

impl Gateway {
    pub fn new(adapter: Arc<dyn ProviderAdapter>, policies: EndpointPolicies) -> Self {
        Self {
            authentication: AuthenticationGuard::new(adapter),
            policies: Arc::new(policies),
        }
    }

    pub fn provider(&self) -> AuthProvider {
        self.authentication.adapter().provider()
    }

    /// Run the pipeline for one request
    pub async fn evaluate(
        &self,
        method: &Method,
        route: Option<&str>,
        headers: &HeaderMap,
    ) -> RequestAuthContext {
        let required = match self.policies.access_for(method, route) {
            Access::Unprotected => return RequestAuthContext::Bypassed,
            Access::Protected(required) => required,
        };

        let user = match self.authentication.authenticate(headers).await {
            Ok(user) => user,
            Err(rejection) => return RequestAuthContext::Rejected(rejection),
        };

        match RoleGuard::authorize(Some(&user), &required) {
            Ok(()) => RequestAuthContext::Authorized(user),
            Err(rejection) => RequestAuthContext::Rejected(rejection),
        }
    }
}

/// Axum middleware enforcing the gateway on every request.
///
/// On success the `AuthUser` is placed in request extensions, where the
/// `AuthUser` extractor picks it up.
pub async fn guard(State(gateway): State<Gateway>, mut request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned());

    let outcome = gateway
        .evaluate(request.method(), route.as_deref(), request.headers())
        .await;

    match outcome {
        RequestAuthContext::Bypassed => next.run(request).await,
        RequestAuthContext::Authorized(user) => {
            tracing::debug!(user_id = %user.id, role = %user.role, "Request authorized");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        RequestAuthContext::Rejected(rejection) => {
            tracing::debug!(
                method = %request.method(),
                route = route.as_deref().unwrap_or("<unmatched>"),
                code = rejection.error_code(),
                "Request rejected by auth gateway"
            );
            rejection.into_response()
        }
    }
}
