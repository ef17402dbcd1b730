//! Main configuration types.
//!
//! This module provides the top-level [`ArgusConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{BearerConfig, ConfigError, LogFormat, TelemetryConfigSection};

/// Complete Argus configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use argus_config::ArgusConfig;
///
/// let config = ArgusConfig::default();
/// assert_eq!(config.telemetry.service_name, "argus");
/// assert!(config.bearer.error.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ArgusConfig {
    /// Telemetry configuration (metrics, logging).
    #[serde(default)]
    pub telemetry: TelemetryConfigSection,

    /// Bearer stage configuration.
    #[serde(default)]
    pub bearer: BearerConfig,
}

impl ArgusConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ArgusConfigBuilder {
        ArgusConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The log level is not a valid filter directive
    /// - Metrics are enabled and the metrics address is not a socket address
    pub fn validate(&self) -> Result<(), ConfigError> {
        let logging = &self.telemetry.logging;
        if logging.enabled {
            argus_telemetry::logging::create_env_filter(&logging.level)
                .map_err(|e| ConfigError::invalid_value("telemetry.logging.level", e.to_string()))?;
        }

        let metrics = &self.telemetry.metrics;
        if metrics.enabled && metrics.addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "telemetry.metrics.addr",
                format!("invalid socket address: {}", metrics.addr),
            ));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty, colored debug logs with source locations.
    ///
    /// # Example
    ///
    /// ```
    /// use argus_config::ArgusConfig;
    ///
    /// let config = ArgusConfig::development();
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.ansi_enabled = true;
        config.telemetry.logging.include_location = true;
        config.telemetry.environment = "development".to_string();

        config
    }

    /// Create a production configuration preset.
    ///
    /// JSON logs at info level and the Prometheus exporter enabled.
    ///
    /// # Example
    ///
    /// ```
    /// use argus_config::{ArgusConfig, LogFormat};
    ///
    /// let config = ArgusConfig::production();
    /// assert_eq!(config.telemetry.logging.format, LogFormat::Json);
    /// assert!(config.telemetry.metrics.enabled);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;
        config.telemetry.logging.ansi_enabled = false;
        config.telemetry.metrics.enabled = true;
        config.telemetry.environment = "production".to_string();

        config
    }
}

/// Builder for [`ArgusConfig`].
#[derive(Debug, Default)]
pub struct ArgusConfigBuilder {
    telemetry: Option<TelemetryConfigSection>,
    bearer: Option<BearerConfig>,
}

impl ArgusConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the telemetry configuration.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetryConfigSection) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Set the bearer configuration.
    #[must_use]
    pub fn bearer(mut self, bearer: BearerConfig) -> Self {
        self.bearer = Some(bearer);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections will use their default values.
    #[must_use]
    pub fn build(self) -> ArgusConfig {
        ArgusConfig {
            telemetry: self.telemetry.unwrap_or_default(),
            bearer: self.bearer.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<ArgusConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
