//! Gatekeeper application composition root
//!
//! Wires the selected identity provider into the gateway middleware and
//! mounts the HTTP surface behind it.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use gatekeeper_auth::{
    AuthUser, ConfigurationError, EndpointPolicies, Gateway, ProviderAdapter, ProviderSelector,
    ProviderSettings,
};
use gatekeeper_common::{AppConfig, Error};

pub const HEALTH_PATH: &str = "/api/v1/health";
pub const TEST_LOGGING_PATH: &str = "/api/v1/health/test-logging";
pub const ME_PATH: &str = "/api/v1/auth/me";
pub const ADMIN_PING_PATH: &str = "/api/v1/admin/ping";

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

/// Access rules for every route mounted by [`create_app`]
pub fn endpoint_policies() -> EndpointPolicies {
    EndpointPolicies::new()
        .unprotected(Method::GET, HEALTH_PATH)
        .unprotected(Method::GET, TEST_LOGGING_PATH)
        .require_roles(Method::GET, ADMIN_PING_PATH, ["ADMIN"])
}

/// Select the provider and build the gateway. Fails before any listener
/// is bound.
pub fn build_gateway(settings: &ProviderSettings) -> Result<Gateway, ConfigurationError> {
    let adapter = ProviderSelector::select(settings)?;
    Ok(gateway_with_adapter(adapter))
}

/// Gateway over an already constructed adapter
pub fn gateway_with_adapter(adapter: Arc<dyn ProviderAdapter>) -> Gateway {
    Gateway::new(adapter, endpoint_policies())
}

/// Create the main application router with all routes and middleware
pub fn create_app(config: AppConfig, gateway: Gateway) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route(HEALTH_PATH, get(health_check))
        .route(TEST_LOGGING_PATH, get(test_logging))
        .route(ME_PATH, get(whoami))
        .route(ADMIN_PING_PATH, get(admin_ping))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(gateway, gatekeeper_auth::guard))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CorsLayer::permissive()),
        )
}

/// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Emits one line per level so log shipping can be verified end to end
async fn test_logging(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::info!(request_id = %request_id, env = %state.config.app_env, "Test info log");
    tracing::warn!(request_id = %request_id, env = %state.config.app_env, "Test warn log");
    tracing::error!(request_id = %request_id, env = %state.config.app_env, "Test error log");

    Json(json!({
        "message": "Logs emitted at info, warn and error level",
        "requestId": request_id,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn whoami(user: AuthUser) -> Json<AuthUser> {
    Json(user)
}

async fn admin_ping(user: AuthUser) -> Json<Value> {
    Json(json!({
        "message": "pong",
        "userId": user.id,
        "role": user.role,
    }))
}

async fn not_found(uri: Uri) -> Error {
    Error::NotFound(format!("No route for {}", uri.path()))
}
