//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Env files are an optional
//! convenience for local runs.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_PORT: u16 = 3000;

/// Load `.env.<APP_ENV>` (falling back to `.env.local`) and then `.env`.
///
/// Variables already present in the process environment are never
/// overwritten, so the first file that defines a variable wins.
pub fn load_env_files() {
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
    let specific = format!(".env.{}", app_env);

    match dotenvy::from_filename(&specific) {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, file = %specific, "Failed to parse env file"),
    }

    dotenvy::dotenv().ok();
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment (development, test, production, ...)
    pub app_env: String,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        load_env_files();

        let port = match env::var("PORT") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number, got '{}'", raw))?,
            _ => DEFAULT_PORT,
        };

        Ok(Self {
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "gatekeeper=info".to_string()),
            port,
        })
    }

    /// Whether structured (JSON) logs should be emitted
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}
