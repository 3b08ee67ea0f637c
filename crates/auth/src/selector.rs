//! Provider selection
//!
//! Runs once at startup. Any failure here is fatal: the service must not
//! accept connections with a missing or unknown provider.

use std::sync::Arc;

use crate::config::{KeycloakConfig, ProviderSettings, SupabaseConfig};
use crate::error::ConfigurationError;
use crate::keycloak::KeycloakAdapter;
use crate::provider::ProviderAdapter;
use crate::supabase::SupabaseAdapter;
use crate::types::AuthProvider;

pub struct ProviderSelector;

impl ProviderSelector {
    /// Resolve the raw `AUTH_PROVIDER` value. Absent means Keycloak.
    pub fn resolve(raw: Option<&str>) -> Result<AuthProvider, ConfigurationError> {
        match raw {
            None => Ok(AuthProvider::default()),
            Some(value) => value.parse(),
        }
    }

    /// Build the single adapter for this process.
    ///
    /// Only the selected provider's settings are validated.
    pub fn select(
        settings: &ProviderSettings,
    ) -> Result<Arc<dyn ProviderAdapter>, ConfigurationError> {
        let provider = Self::resolve(settings.provider.as_deref())?;

        tracing::info!(provider = %provider, "Initializing auth gateway with provider: {}", provider);

        let adapter: Arc<dyn ProviderAdapter> = match provider {
            AuthProvider::Keycloak => {
                Arc::new(KeycloakAdapter::new(KeycloakConfig::from_settings(settings)?)?)
            }
            AuthProvider::Supabase => {
                Arc::new(SupabaseAdapter::new(SupabaseConfig::from_settings(settings)?)?)
            }
        };

        Ok(adapter)
    }
}
