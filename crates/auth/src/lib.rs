//! Pluggable authentication gateway
//!
//! One identity provider is selected at startup (`AUTH_PROVIDER`) and every
//! protected request is validated against it before reaching a handler.
//! Keycloak tokens are checked by online introspection; Supabase tokens by a
//! local HS256 check followed by confirmation with the project's auth API.

mod claims;
mod config;
mod error;
mod extractors;
mod gateway;
mod guards;
mod jwt;
mod keycloak;
mod policy;
mod provider;
mod selector;
mod supabase;
mod types;

pub use claims::{IntrospectionResponse, SupabaseClaims, SupabaseUser};
pub use config::{KeycloakConfig, ProviderSettings, SupabaseConfig, DEFAULT_PROVIDER_TIMEOUT};
pub use error::{AuthError, ConfigurationError};
pub use gateway::{guard, Gateway, RequestAuthContext};
pub use guards::{AuthenticationGuard, RoleGuard};
pub use keycloak::KeycloakAdapter;
pub use policy::{Access, EndpointPolicies, RequiredRoles};
pub use provider::ProviderAdapter;
pub use selector::ProviderSelector;
pub use supabase::SupabaseAdapter;
pub use types::{map_role, AuthProvider, AuthUser, DEFAULT_ROLE};
