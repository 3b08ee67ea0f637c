//! Keycloak adapter: online token introspection
//!
//! Every request triggers one introspection call; token validity is never
//! cached locally.

use crate::claims::IntrospectionResponse;
use crate::config::KeycloakConfig;
use crate::error::{AuthError, ConfigurationError};
use crate::provider::{build_http_client, ProviderAdapter};
use crate::types::{AuthProvider, AuthUser};

pub struct KeycloakAdapter {
    http: reqwest::Client,
    config: KeycloakConfig,
    introspection_url: String,
}

impl KeycloakAdapter {
    pub fn new(config: KeycloakConfig) -> Result<Self, ConfigurationError> {
        let http = build_http_client(config.timeout)?;
        let introspection_url = config.introspection_url();

        tracing::info!(
            url = %introspection_url,
            client_id = %config.client_id,
            "Keycloak adapter configured for online introspection"
        );

        Ok(Self {
            http,
            config,
            introspection_url,
        })
    }

    async fn introspect(&self, token: &str) -> Result<IntrospectionResponse, AuthError> {
        let mut form = vec![
            ("token", token),
            ("token_type_hint", "access_token"),
            ("client_id", self.config.client_id.as_str()),
        ];
        if let Some(secret) = &self.config.client_secret {
            form.push(("client_secret", secret.as_str()));
        }

        let response = self
            .http
            .post(&self.introspection_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, timeout = e.is_timeout(), "Keycloak introspection request failed");
                AuthError::TokenValidationFailed
            })?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Keycloak rejected introspection request");
            return Err(AuthError::InvalidToken);
        }

        response.json::<IntrospectionResponse>().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to decode Keycloak introspection response");
            AuthError::TokenValidationFailed
        })
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for KeycloakAdapter {
    fn provider(&self) -> AuthProvider {
        AuthProvider::Keycloak
    }

    async fn validate_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        let introspection = self.introspect(token).await?;

        if !introspection.active {
            tracing::debug!("Keycloak reported token inactive");
            return Err(AuthError::InvalidToken);
        }

        let sub = introspection
            .sub
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                tracing::warn!("Active Keycloak token has no subject");
                AuthError::InvalidToken
            })?;

        let client_id = self.config.client_id.as_str();
        Ok(AuthUser::new(
            sub,
            introspection.email.clone().unwrap_or_default(),
            introspection.role(client_id),
        )
        .with_roles(introspection.roles(client_id)))
    }
}
