//! Declarative endpoint access metadata
//!
//! Policies are registered once at startup, keyed by HTTP method and the
//! axum route template (`/api/v1/items/{id}`, not the concrete path).

use std::collections::{BTreeSet, HashMap};

use axum::http::Method;

/// Roles an endpoint requires. Names are uppercased on insert so they
/// compare against normalized identity roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredRoles(BTreeSet<String>);

impl RequiredRoles {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn any_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            roles
                .into_iter()
                .map(|r| r.as_ref().trim().to_uppercase())
                .filter(|r| !r.is_empty())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Access rule for one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Skips authentication and role checks entirely
    Unprotected,
    /// Requires a valid token, and one of the roles when any are listed
    Protected(RequiredRoles),
}

impl Default for Access {
    /// Permissive: authenticated, no role requirement
    fn default() -> Self {
        Access::Protected(RequiredRoles::none())
    }
}

/// Registry of per-endpoint access rules
#[derive(Debug, Clone, Default)]
pub struct EndpointPolicies {
    rules: HashMap<(Method, String), Access>,
}

impl EndpointPolicies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an endpoint as bypassing both guards
    pub fn unprotected(mut self, method: Method, route: &str) -> Self {
        self.rules
            .insert((method, route.to_string()), Access::Unprotected);
        self
    }

    /// Require one of `roles` for an endpoint
    pub fn require_roles<I, S>(mut self, method: Method, route: &str, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rules.insert(
            (method, route.to_string()),
            Access::Protected(RequiredRoles::any_of(roles)),
        );
        self
    }

    /// Rule for a matched route. `None` (unmatched request) is protected.
    pub fn access_for(&self, method: &Method, route: Option<&str>) -> Access {
        let Some(route) = route else {
            return Access::default();
        };

        let lookup = |m: &Method| self.rules.get(&(m.clone(), route.to_string())).cloned();

        // HEAD is served by GET handlers
        lookup(method)
            .or_else(|| (*method == Method::HEAD).then(|| lookup(&Method::GET)).flatten())
            .unwrap_or_default()
    }
}
