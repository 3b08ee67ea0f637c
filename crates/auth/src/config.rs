//! Authentication configuration
//!
//! `ProviderSettings` is read once from the environment without validation.
//! Each adapter validates only its own subset when the selector builds it.

use std::time::Duration;

use crate::error::ConfigurationError;

/// Default bound on every outbound provider call
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(5);

/// Raw provider settings as read from the process environment.
///
/// Every field is optional here; empty strings are treated as absent.
#[derive(Clone, Default)]
pub struct ProviderSettings {
    /// `AUTH_PROVIDER`
    pub provider: Option<String>,
    /// `AUTH_PROVIDER_TIMEOUT_SECS`
    pub timeout_secs: Option<String>,

    pub keycloak_auth_server_url: Option<String>,
    pub keycloak_realm: Option<String>,
    pub keycloak_client_id: Option<String>,
    pub keycloak_client_secret: Option<String>,

    pub supabase_jwt_secret: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub supabase_jwt_audience: Option<String>,
    pub supabase_jwt_issuer: Option<String>,
}

impl std::fmt::Debug for ProviderSettings {
    #[mutants::skip] // Debug output only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("provider", &self.provider)
            .field("timeout_secs", &self.timeout_secs)
            .field("keycloak_auth_server_url", &self.keycloak_auth_server_url)
            .field("keycloak_realm", &self.keycloak_realm)
            .field("keycloak_client_id", &self.keycloak_client_id)
            .field(
                "keycloak_client_secret",
                &self.keycloak_client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "supabase_jwt_secret",
                &self.supabase_jwt_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("supabase_url", &self.supabase_url)
            .field(
                "supabase_anon_key",
                &self.supabase_anon_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("supabase_jwt_audience", &self.supabase_jwt_audience)
            .field("supabase_jwt_issuer", &self.supabase_jwt_issuer)
            .finish()
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ProviderSettings {
    /// Read provider settings from environment variables
    pub fn from_env() -> Self {
        Self {
            provider: env_opt("AUTH_PROVIDER"),
            timeout_secs: env_opt("AUTH_PROVIDER_TIMEOUT_SECS"),

            keycloak_auth_server_url: env_opt("KEYCLOAK_AUTH_SERVER_URL"),
            keycloak_realm: env_opt("KEYCLOAK_REALM"),
            keycloak_client_id: env_opt("KEYCLOAK_CLIENT_ID"),
            keycloak_client_secret: env_opt("KEYCLOAK_CLIENT_SECRET"),

            supabase_jwt_secret: env_opt("SUPABASE_JWT_SECRET"),
            supabase_url: env_opt("SUPABASE_URL"),
            supabase_anon_key: env_opt("SUPABASE_ANON_KEY"),
            supabase_jwt_audience: env_opt("SUPABASE_JWT_AUDIENCE"),
            supabase_jwt_issuer: env_opt("SUPABASE_JWT_ISSUER"),
        }
    }

    /// Outbound call timeout, defaulting to five seconds
    pub fn timeout(&self) -> Result<Duration, ConfigurationError> {
        match non_empty(&self.timeout_secs) {
            None => Ok(DEFAULT_PROVIDER_TIMEOUT),
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigurationError::InvalidSetting {
                    variable: "AUTH_PROVIDER_TIMEOUT_SECS",
                    reason: format!("expected a whole number of seconds, got '{}'", raw),
                })?;
                if secs == 0 {
                    return Err(ConfigurationError::InvalidSetting {
                        variable: "AUTH_PROVIDER_TIMEOUT_SECS",
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Ok(Duration::from_secs(secs))
            }
        }
    }
}

/// Keycloak connection settings
#[derive(Clone)]
pub struct KeycloakConfig {
    pub auth_server_url: String,
    pub realm: String,
    pub client_id: String,
    pub client_secret: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for KeycloakConfig {
    #[mutants::skip] // Debug output only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeycloakConfig")
            .field("auth_server_url", &self.auth_server_url)
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl KeycloakConfig {
    /// Validate the Keycloak subset of the settings.
    ///
    /// Server URL, realm and client id are required; the secret is optional.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ConfigurationError> {
        let require = |value: &Option<String>, variable: &'static str| {
            non_empty(value)
                .map(str::to_string)
                .ok_or(ConfigurationError::MissingSetting {
                    provider: "keycloak",
                    variable,
                })
        };

        Ok(Self {
            auth_server_url: require(
                &settings.keycloak_auth_server_url,
                "KEYCLOAK_AUTH_SERVER_URL",
            )?,
            realm: require(&settings.keycloak_realm, "KEYCLOAK_REALM")?,
            client_id: require(&settings.keycloak_client_id, "KEYCLOAK_CLIENT_ID")?,
            client_secret: non_empty(&settings.keycloak_client_secret).map(str::to_string),
            timeout: settings.timeout()?,
        })
    }

    /// RFC 7662 introspection endpoint for the configured realm
    pub fn introspection_url(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token/introspect",
            self.auth_server_url.trim_end_matches('/'),
            self.realm
        )
    }
}

/// Supabase connection settings
#[derive(Clone)]
pub struct SupabaseConfig {
    pub jwt_secret: String,
    pub project_url: String,
    pub anon_key: String,
    pub audience: Option<String>,
    pub issuer: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for SupabaseConfig {
    #[mutants::skip] // Debug output only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("project_url", &self.project_url)
            .field("anon_key", &"[REDACTED]")
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SupabaseConfig {
    /// Validate the Supabase subset of the settings.
    ///
    /// Only the JWT secret is required. Project URL and anon key default to
    /// empty, in which case every identity confirmation fails closed.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ConfigurationError> {
        let jwt_secret = non_empty(&settings.supabase_jwt_secret)
            .map(str::to_string)
            .ok_or(ConfigurationError::MissingSetting {
                provider: "supabase",
                variable: "SUPABASE_JWT_SECRET",
            })?;

        Ok(Self {
            jwt_secret,
            project_url: non_empty(&settings.supabase_url)
                .unwrap_or_default()
                .to_string(),
            anon_key: non_empty(&settings.supabase_anon_key)
                .unwrap_or_default()
                .to_string(),
            audience: non_empty(&settings.supabase_jwt_audience).map(str::to_string),
            issuer: non_empty(&settings.supabase_jwt_issuer).map(str::to_string),
            timeout: settings.timeout()?,
        })
    }

    /// Identity confirmation endpoint (`GET /auth/v1/user`)
    pub fn user_url(&self) -> String {
        format!("{}/auth/v1/user", self.project_url.trim_end_matches('/'))
    }
}
