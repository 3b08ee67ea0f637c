//! Provider adapter capability
//!
//! One implementation per external identity provider. Exactly one adapter
//! is constructed per process and shared as `Arc<dyn ProviderAdapter>`.

use std::time::Duration;

use crate::error::{AuthError, ConfigurationError};
use crate::types::{AuthProvider, AuthUser};

/// Validates a bearer token against one external identity provider.
///
/// Implementations hold only configuration and a long-lived HTTP client,
/// so a single instance serves any number of concurrent requests.
#[async_trait::async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Which provider this adapter talks to
    fn provider(&self) -> AuthProvider;

    /// Validate `token` and return the normalized identity.
    ///
    /// Never retries. A provider outage rejects the request.
    async fn validate_token(&self, token: &str) -> Result<AuthUser, AuthError>;
}

/// HTTP client for provider calls, bounded by `timeout` end to end.
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ConfigurationError> {
    let client = reqwest::Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()?;
    Ok(client)
}
