//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Per-request rejection produced by the guard chain.
///
/// Every variant terminates the request; none propagate past the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No bearer token on the request
    TokenNotFound,
    /// Bad signature, expired, or rejected by the provider
    InvalidToken,
    /// Unexpected failure while confirming the token with the provider.
    /// The underlying cause is logged, never returned.
    TokenValidationFailed,
    /// Authenticated identity lacks a required role
    Forbidden,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::TokenNotFound
            | AuthError::InvalidToken
            | AuthError::TokenValidationFailed => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::TokenNotFound => "TOKEN_NOT_FOUND",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::TokenValidationFailed => "TOKEN_VALIDATION_FAILED",
            AuthError::Forbidden => "FORBIDDEN",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AuthError::TokenNotFound => "Token not found",
            AuthError::InvalidToken => "Invalid token",
            AuthError::TokenValidationFailed => "Token validation failed",
            AuthError::Forbidden => "Insufficient role for this resource",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.message(),
            }
        }));

        let mut response = (self.status_code(), body).into_response();
        if self.status_code() == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

/// Boot-time configuration failure. Fatal: the process must not serve traffic.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Unsupported auth provider: {value}. Supported: {supported}")]
    UnsupportedProvider { value: String, supported: String },

    #[error("Missing required {provider} configuration: {variable}")]
    MissingSetting {
        provider: &'static str,
        variable: &'static str,
    },

    #[error("Invalid value for {variable}: {reason}")]
    InvalidSetting {
        variable: &'static str,
        reason: String,
    },

    #[error("Failed to build provider HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
