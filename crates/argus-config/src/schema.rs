//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use argus_core::ErrorOption;
use serde::{Deserialize, Serialize};

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Enable the Prometheus exporter.
    #[serde(default)]
    pub enabled: bool,

    /// Prometheus metrics endpoint address.
    #[serde(default = "default_metrics_addr")]
    pub addr: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: default_metrics_addr(),
        }
    }
}

fn default_metrics_addr() -> String {
    "0.0.0.0:9090".to_string()
}

impl From<&MetricsConfig> for argus_telemetry::MetricsConfig {
    fn from(config: &MetricsConfig) -> Self {
        Self {
            enabled: config.enabled,
            addr: config.addr.clone(),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g. "info" or "argus_middleware=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts this section into the telemetry crate's logging settings.
    #[must_use]
    pub fn to_log_config(&self, service_name: &str) -> argus_telemetry::LogConfig {
        let base = match self.format {
            LogFormat::Json => argus_telemetry::LogConfig::production(),
            LogFormat::Pretty => argus_telemetry::LogConfig::development(),
        };

        argus_telemetry::LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            ansi: self.ansi_enabled,
            file_line_info: self.include_location,
            service_name: service_name.to_string(),
            ..base
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telemetry configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfigSection {
    /// Service name for telemetry identification.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Deployment environment (e.g., "development", "staging", "production").
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TelemetryConfigSection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            environment: default_environment(),
            metrics: MetricsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TelemetryConfigSection {
    /// Converts this section into an [`argus_telemetry::TelemetryConfig`]
    /// ready for [`argus_telemetry::init_telemetry`].
    #[must_use]
    pub fn to_telemetry_config(&self) -> argus_telemetry::TelemetryConfig {
        argus_telemetry::TelemetryConfig::builder()
            .service_name(&self.service_name)
            .environment(&self.environment)
            .logging(self.logging.to_log_config(&self.service_name))
            .metrics((&self.metrics).into())
            .build()
    }
}

fn default_service_name() -> String {
    "argus".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

/// Bearer stage configuration section.
///
/// `error` accepts either a message or a table:
///
/// ```toml
/// [bearer]
/// error = "Unauthorized"
/// ```
///
/// ```toml
/// [bearer.error]
/// code = 16
/// metadata = { code = "INVALID_TOKEN" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BearerConfig {
    /// Error raised for calls without a valid credential. Absent means
    /// `Not Authorized`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorOption>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_default() {
        let config = MetricsConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.addr, "0.0.0.0:9090");
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_log_format_deserialize() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);

        let format: LogFormat = serde_json::from_str(r#""pretty""#).unwrap();
        assert_eq!(format, LogFormat::Pretty);
    }

    #[test]
    fn test_logging_to_log_config() {
        let section = LoggingConfig {
            level: "argus_middleware=trace,info".to_string(),
            format: LogFormat::Pretty,
            ansi_enabled: true,
            include_location: true,
            ..Default::default()
        };

        let config = section.to_log_config("bearer-service");
        assert!(!config.json_format);
        assert!(config.ansi);
        assert!(config.file_line_info);
        assert_eq!(config.level, "argus_middleware=trace,info");
        assert_eq!(config.service_name, "bearer-service");
    }

    #[test]
    fn test_telemetry_section_conversion() {
        let section = TelemetryConfigSection {
            service_name: "bearer-service".to_string(),
            metrics: MetricsConfig {
                enabled: true,
                addr: "127.0.0.1:9100".to_string(),
            },
            ..Default::default()
        };

        let config = section.to_telemetry_config();
        assert_eq!(config.service_name, "bearer-service");
        assert_eq!(config.logging.service_name, "bearer-service");
        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.addr, "127.0.0.1:9100");
    }

    #[test]
    fn test_bearer_config_message() {
        let config: BearerConfig = toml::from_str(r#"error = "Unauthorized""#).unwrap();
        assert_eq!(config.error, Some(ErrorOption::from("Unauthorized")));
    }

    #[test]
    fn test_bearer_config_descriptor() {
        let config: BearerConfig = toml::from_str(
            r#"
            [error]
            metadata = { code = "INVALID_TOKEN" }
            "#,
        )
        .unwrap();

        match config.error {
            Some(ErrorOption::Descriptor(descriptor)) => {
                assert!(descriptor.message.is_none());
                assert_eq!(
                    descriptor.metadata.unwrap().get("code"),
                    Some("INVALID_TOKEN")
                );
            }
            other => panic!("Expected descriptor, got {other:?}"),
        }
    }

    #[test]
    fn test_bearer_config_unknown_field_rejected() {
        let result: Result<BearerConfig, _> = toml::from_str(r#"errors = "typo""#);
        assert!(result.is_err());
    }
}
