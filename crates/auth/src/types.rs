//! Identity and provider types

use serde::Serialize;
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::ConfigurationError;

/// Role assigned when the provider carries no role for the identity
pub const DEFAULT_ROLE: &str = "USER";

/// External identity provider backing the gateway.
///
/// Chosen once at startup and fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    #[default]
    Keycloak,
    Supabase,
}

impl AuthProvider {
    /// Every accepted configuration value, in declaration order
    pub const SUPPORTED: [AuthProvider; 2] = [AuthProvider::Keycloak, AuthProvider::Supabase];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Keycloak => "keycloak",
            AuthProvider::Supabase => "supabase",
        }
    }

    /// Comma-separated list of supported values, for error messages
    pub fn supported_list() -> String {
        Self::SUPPORTED
            .iter()
            .map(AuthProvider::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthProvider {
    type Err = ConfigurationError;

    /// Case-sensitive: `Keycloak` is not a supported value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SUPPORTED
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnsupportedProvider {
                value: s.to_string(),
                supported: Self::supported_list(),
            })
    }
}

/// Normalized authenticated identity.
///
/// Built fresh on every successful validation and owned by the request
/// that produced it. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    /// Provider-issued subject identifier
    pub id: String,
    pub email: String,
    /// Primary normalized (uppercase) role
    pub role: String,
    /// Every normalized role the provider granted; always contains `role`
    pub roles: BTreeSet<String>,
}

impl AuthUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Option<&str>) -> Self {
        let role = map_role(role);
        Self {
            id: id.into(),
            email: email.into(),
            roles: BTreeSet::from([role.clone()]),
            role,
        }
    }

    /// Add further granted roles. Empty names are skipped.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.roles.extend(
            roles
                .into_iter()
                .filter(|r| !r.as_ref().is_empty())
                .map(|r| map_role(Some(r.as_ref()))),
        );
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Normalize a provider role: absent or empty becomes `USER`, anything else
/// is uppercased verbatim. There is no whitelist.
pub fn map_role(role: Option<&str>) -> String {
    match role {
        Some(r) if !r.is_empty() => r.to_uppercase(),
        _ => DEFAULT_ROLE.to_string(),
    }
}
