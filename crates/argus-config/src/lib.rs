//! Typed configuration for Argus.
//!
//! This crate provides a strongly-typed configuration system with support for:
//! - TOML and JSON configuration files
//! - `.env` files and environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`ArgusConfig`] has two sections:
//!
//! - [`TelemetryConfigSection`] - Logging and metrics settings
//! - [`BearerConfig`] - The error raised for calls without a valid credential
//!
//! # Example
//!
//! ```no_run
//! use argus_config::{ArgusConfig, ConfigLoader};
//!
//! # fn main() -> Result<(), argus_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_file("argus.toml")?
//!     .with_dotenv()?
//!     .with_env_prefix("ARGUS")
//!     .load()?;
//!
//! println!("Rejections raise: {:?}", config.bearer.error);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [telemetry]
//! service_name = "bearer-service"
//! environment = "production"
//!
//! [telemetry.metrics]
//! enabled = true
//! addr = "0.0.0.0:9090"
//!
//! [telemetry.logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! [bearer.error]
//! message = "Not Authorized"
//! code = 16
//! metadata = { code = "INVALID_TOKEN" }
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden via environment variables using the format
//! `PREFIX__SECTION__KEY`. For example:
//!
//! - `ARGUS__BEARER__ERROR__MESSAGE=Unauthorized`
//! - `ARGUS__BEARER__ERROR__CODE=16`
//! - `ARGUS__BEARER__ERROR__METADATA__CODE=INVALID_TOKEN`
//! - `ARGUS__TELEMETRY__LOGGING__LEVEL=debug`
//! - `ARGUS__TELEMETRY__METRICS__ENABLED=false`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
