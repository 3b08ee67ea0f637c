//! Shared configuration and error handling for Gatekeeper
//!
//! This crate provides common functionality used across the Gatekeeper workspace:
//! - Process configuration following 12-factor principles
//! - Application error type with JSON error responses

pub mod config;
pub mod error;

pub use config::{load_env_files, AppConfig};
pub use error::Error;
