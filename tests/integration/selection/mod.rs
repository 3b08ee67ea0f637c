//! Startup provider selection from the process environment

use serial_test::serial;

use gatekeeper_auth::{AuthProvider, ConfigurationError, ProviderSettings};

const VARS: &[&str] = &[
    "AUTH_PROVIDER",
    "AUTH_PROVIDER_TIMEOUT_SECS",
    "KEYCLOAK_AUTH_SERVER_URL",
    "KEYCLOAK_REALM",
    "KEYCLOAK_CLIENT_ID",
    "KEYCLOAK_CLIENT_SECRET",
    "SUPABASE_JWT_SECRET",
    "SUPABASE_URL",
    "SUPABASE_ANON_KEY",
    "SUPABASE_JWT_AUDIENCE",
    "SUPABASE_JWT_ISSUER",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_keycloak_is_default_provider() {
    clear_env();
    std::env::set_var("KEYCLOAK_AUTH_SERVER_URL", "http://keycloak.local");
    std::env::set_var("KEYCLOAK_REALM", "gatekeeper");
    std::env::set_var("KEYCLOAK_CLIENT_ID", "gatekeeper-api");

    let gateway = gatekeeper_app::build_gateway(&ProviderSettings::from_env()).unwrap();
    assert_eq!(gateway.provider(), AuthProvider::Keycloak);

    clear_env();
}

#[test]
#[serial]
fn test_supabase_selected_from_env() {
    clear_env();
    std::env::set_var("AUTH_PROVIDER", "supabase");
    std::env::set_var("SUPABASE_JWT_SECRET", "secret");

    let gateway = gatekeeper_app::build_gateway(&ProviderSettings::from_env()).unwrap();
    assert_eq!(gateway.provider(), AuthProvider::Supabase);

    clear_env();
}

#[test]
#[serial]
fn test_unsupported_provider_is_fatal() {
    clear_env();
    std::env::set_var("AUTH_PROVIDER", "auth0");

    let err = match gatekeeper_app::build_gateway(&ProviderSettings::from_env()) {
        Err(e) => e,
        Ok(_) => panic!("auth0 must not be accepted"),
    };
    assert!(matches!(err, ConfigurationError::UnsupportedProvider { .. }));
    assert!(err.to_string().contains("auth0"));
    assert!(err.to_string().contains("keycloak, supabase"));

    clear_env();
}

#[test]
#[serial]
fn test_empty_values_count_as_missing() {
    clear_env();
    std::env::set_var("AUTH_PROVIDER", "supabase");
    std::env::set_var("SUPABASE_JWT_SECRET", "");

    let err = match gatekeeper_app::build_gateway(&ProviderSettings::from_env()) {
        Err(e) => e,
        Ok(_) => panic!("empty secret must be rejected"),
    };
    assert!(matches!(
        err,
        ConfigurationError::MissingSetting {
            variable: "SUPABASE_JWT_SECRET",
            ..
        }
    ));

    clear_env();
}

#[test]
#[serial]
fn test_invalid_timeout_is_fatal() {
    clear_env();
    std::env::set_var("AUTH_PROVIDER", "supabase");
    std::env::set_var("SUPABASE_JWT_SECRET", "secret");
    std::env::set_var("AUTH_PROVIDER_TIMEOUT_SECS", "soon");

    assert!(matches!(
        gatekeeper_app::build_gateway(&ProviderSettings::from_env()),
        Err(ConfigurationError::InvalidSetting { .. })
    ));

    clear_env();
}
