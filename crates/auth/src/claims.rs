//! Token claims and provider response types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JWT claims from Supabase
#[derive(Debug, Serialize, Deserialize)]
pub struct SupabaseClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    /// Expires at
    pub exp: u64,
    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Postgres role (`authenticated`, `anon`, ...), not the application role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// User object returned by Supabase `GET /auth/v1/user`
#[derive(Debug, Deserialize)]
pub struct SupabaseUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub app_metadata: Option<Value>,
    #[serde(default)]
    pub user_metadata: Option<Value>,
}

impl SupabaseUser {
    /// Application role: `app_metadata.role` first, then `user_metadata.role`.
    ///
    /// Empty strings and non-string values count as absent.
    pub fn role(&self) -> Option<&str> {
        role_in(self.app_metadata.as_ref()).or_else(|| role_in(self.user_metadata.as_ref()))
    }
}

fn role_in(metadata: Option<&Value>) -> Option<&str> {
    metadata
        .and_then(|m| m.get("role"))
        .and_then(Value::as_str)
        .filter(|r| !r.is_empty())
}

/// Keycloak role container (`realm_access` / `resource_access.<client>`)
#[derive(Debug, Default, Deserialize)]
pub struct RoleSet {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// RFC 7662 token introspection response as served by Keycloak
#[derive(Debug, Deserialize)]
pub struct IntrospectionResponse {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub realm_access: Option<RoleSet>,
    #[serde(default)]
    pub resource_access: HashMap<String, RoleSet>,
}

/// Realm roles Keycloak grants to every user
fn is_builtin_realm_role(role: &str) -> bool {
    role == "offline_access" || role == "uma_authorization" || role.starts_with("default-roles-")
}

impl IntrospectionResponse {
    /// Every granted role: client roles for `client_id`, then realm roles
    /// other than the built-ins.
    pub fn roles<'a>(&'a self, client_id: &str) -> impl Iterator<Item = &'a str> + 'a {
        let client_roles = self
            .resource_access
            .get(client_id)
            .into_iter()
            .flat_map(|set| set.roles.iter());
        let realm_roles = self
            .realm_access
            .iter()
            .flat_map(|set| set.roles.iter())
            .filter(|r| !is_builtin_realm_role(r));

        client_roles.chain(realm_roles).map(String::as_str)
    }

    /// Primary role for `client_id`: first client role, else first non built-in realm role.
    pub fn role(&self, client_id: &str) -> Option<&str> {
        let client_role = self
            .resource_access
            .get(client_id)
            .and_then(|set| set.roles.first())
            .map(String::as_str);

        client_role.or_else(|| {
            self.realm_access.as_ref().and_then(|set| {
                set.roles
                    .iter()
                    .map(String::as_str)
                    .find(|r| !is_builtin_realm_role(r))
            })
        })
    }
}
