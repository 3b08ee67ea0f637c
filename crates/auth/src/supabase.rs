//! Supabase adapter: two-phase token validation
//!
//! Phase 1 verifies signature and expiry locally. Phase 2 presents the same
//! token to `GET /auth/v1/user`, which also catches revoked sessions. Both
//! phases must pass; phase 2 never runs when phase 1 fails.

use reqwest::StatusCode;

use crate::claims::SupabaseUser;
use crate::config::SupabaseConfig;
use crate::error::{AuthError, ConfigurationError};
use crate::jwt::validate_jwt_token;
use crate::provider::{build_http_client, ProviderAdapter};
use crate::types::{AuthProvider, AuthUser};

/// Outcome of the identity confirmation call, before normalization
enum Confirmation {
    Confirmed { id: String, user: SupabaseUser },
    /// Provider answered but returned no identity
    NoIdentity,
}

pub struct SupabaseAdapter {
    http: reqwest::Client,
    config: SupabaseConfig,
    user_url: String,
}

impl SupabaseAdapter {
    pub fn new(config: SupabaseConfig) -> Result<Self, ConfigurationError> {
        let http = build_http_client(config.timeout)?;
        let user_url = config.user_url();

        if config.project_url.is_empty() {
            tracing::warn!("SUPABASE_URL is not set; every identity confirmation will fail");
        }

        Ok(Self {
            http,
            config,
            user_url,
        })
    }

    /// Phase 2. `Err` is reserved for unexpected failures (transport,
    /// timeout, undecodable body); a negative answer is `NoIdentity`.
    async fn confirm_identity(&self, token: &str) -> Result<Confirmation, reqwest::Error> {
        let response = self
            .http
            .get(&self.user_url)
            .bearer_auth(token)
            .header("apikey", &self.config.anon_key)
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            response.error_for_status_ref()?;
        }
        if !status.is_success() {
            tracing::debug!(status = %status, "Supabase returned no identity for token");
            return Ok(Confirmation::NoIdentity);
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Confirmation::NoIdentity);
        }

        let user = response.json::<SupabaseUser>().await?;
        match user.id.clone().filter(|id| !id.is_empty()) {
            Some(id) => Ok(Confirmation::Confirmed { id, user }),
            None => Ok(Confirmation::NoIdentity),
        }
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for SupabaseAdapter {
    fn provider(&self) -> AuthProvider {
        AuthProvider::Supabase
    }

    async fn validate_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        // Phase 1: local signature + expiry check, no network
        let claims = validate_jwt_token(token, &self.config)?;

        // Phase 2: remote confirmation
        let (id, user) = match self.confirm_identity(token).await {
            Ok(Confirmation::Confirmed { id, user }) => (id, user),
            Ok(Confirmation::NoIdentity) => return Err(AuthError::InvalidToken),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    timeout = e.is_timeout(),
                    sub = %claims.sub,
                    "Supabase identity confirmation failed"
                );
                return Err(AuthError::TokenValidationFailed);
            }
        };

        Ok(AuthUser::new(
            id,
            user.email.clone().unwrap_or_default(),
            user.role(),
        ))
    }
}
