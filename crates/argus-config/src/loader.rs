//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: defaults, files, and environment variables.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use argus_core::{ErrorDescriptor, ErrorOption, Metadata};

use crate::{ArgusConfig, ConfigError, LogFormat};

/// Configuration loader with layered approach.
///
/// The loader applies configuration in layers, with later layers overriding
/// earlier ones:
/// 1. Default values (built into the code)
/// 2. Configuration file or string (TOML or JSON)
/// 3. Environment variables, optionally seeded from a `.env` file
///
/// # Example
///
/// ```no_run
/// use argus_config::ConfigLoader;
///
/// # fn main() -> Result<(), argus_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_file("argus.toml")?
///     .with_env_prefix("ARGUS")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: ArgusConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ArgusConfig::default(),
            env_prefix: None,
        }
    }

    /// Start with default configuration values.
    ///
    /// This is called automatically by `new()`, but can be chained for clarity.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = ArgusConfig::default();
        self
    }

    /// Start with development preset configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use argus_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_development()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = ArgusConfig::development();
        self
    }

    /// Start with production preset configuration.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = ArgusConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// Supports TOML (.toml) and JSON (.json) formats.
    /// The file format is determined by the file extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The file contains invalid TOML/JSON
    /// - The file contains unknown fields
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let file_config = Self::parse_file(&content, path)?;
        self.merge_config(file_config);

        Ok(self)
    }

    /// Load configuration from an optional file.
    ///
    /// If the file exists, loads it. If not, silently continues.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string.
    ///
    /// `format` is `"toml"` or `"json"`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use argus_config::ConfigLoader;
    /// use argus_core::ErrorOption;
    ///
    /// let toml = r#"
    ///     [bearer]
    ///     error = "Unauthorized"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.bearer.error, Some(ErrorOption::from("Unauthorized")));
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let file_config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration format: {format}"
                )))
            }
        };

        self.merge_config(file_config);
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Environment variables use the format `PREFIX__SECTION__KEY`.
    /// For example, with prefix "ARGUS":
    /// - `ARGUS__BEARER__ERROR__MESSAGE=Unauthorized`
    /// - `ARGUS__TELEMETRY__LOGGING__LEVEL=debug`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file from the current directory or its parents.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DotenvError` if a `.env` file exists but cannot
    /// be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Finalize and return the loaded configuration.
    ///
    /// Applies environment variable overrides (if a prefix was set) and
    /// validates the final configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Environment variable parsing fails
    /// - Configuration validation fails
    pub fn load(mut self) -> Result<ArgusConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Finalize without validation.
    #[must_use]
    pub fn load_unvalidated(self) -> ArgusConfig {
        self.config
    }

    // Parse configuration file based on extension
    fn parse_file(content: &str, path: &Path) -> Result<ArgusConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::validation_error(format!(
                "unsupported configuration file format: {}",
                path.display()
            ))),
        }
    }

    // A parsed file replaces the current configuration; serde defaults fill
    // the sections it leaves out.
    fn merge_config(&mut self, file_config: ArgusConfig) {
        self.config = file_config;
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let env_vars: HashMap<String, String> = env::vars()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();

        for (key, value) in env_vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(key_without_prefix) = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
        else {
            // Shares the prefix but is not ours, e.g. ARGUS_HOME.
            return Ok(());
        };

        let parts: Vec<&str> = key_without_prefix.split("__").collect();

        match parts.as_slice() {
            // Telemetry section
            ["TELEMETRY", "SERVICE_NAME"] => {
                self.config.telemetry.service_name = value.to_string();
            }
            ["TELEMETRY", "ENVIRONMENT"] => {
                self.config.telemetry.environment = value.to_string();
            }

            // Telemetry metrics
            ["TELEMETRY", "METRICS", "ENABLED"] => {
                self.config.telemetry.metrics.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["TELEMETRY", "METRICS", "ADDR"] => {
                self.config.telemetry.metrics.addr = value.to_string();
            }

            // Telemetry logging
            ["TELEMETRY", "LOGGING", "ENABLED"] => {
                self.config.telemetry.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["TELEMETRY", "LOGGING", "LEVEL"] => {
                self.config.telemetry.logging.level = value.to_string();
            }
            ["TELEMETRY", "LOGGING", "FORMAT"] => {
                self.config.telemetry.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["TELEMETRY", "LOGGING", "ANSI_ENABLED"] => {
                self.config.telemetry.logging.ansi_enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            // Bearer section
            ["BEARER", "ERROR", "MESSAGE"] => {
                self.config.bearer.error = Some(match self.config.bearer.error.take() {
                    Some(ErrorOption::Descriptor(descriptor)) => {
                        ErrorOption::Descriptor(descriptor.message(value))
                    }
                    _ => ErrorOption::Message(value.to_string()),
                });
            }
            ["BEARER", "ERROR", "CODE"] => {
                let code: i32 = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
                let descriptor = into_descriptor(self.config.bearer.error.take()).code(code);
                self.config.bearer.error = Some(ErrorOption::Descriptor(descriptor));
            }
            ["BEARER", "ERROR", "METADATA", name] if !name.is_empty() => {
                let mut descriptor = into_descriptor(self.config.bearer.error.take());
                descriptor
                    .metadata
                    .get_or_insert_with(Metadata::new)
                    .insert(name.to_lowercase(), value);
                self.config.bearer.error = Some(ErrorOption::Descriptor(descriptor));
            }

            // Unknown key - ignore
            _ => {}
        }

        Ok(())
    }
}

/// Widens an error option into a descriptor, keeping any message.
fn into_descriptor(error: Option<ErrorOption>) -> ErrorDescriptor {
    match error {
        None => ErrorDescriptor::new(),
        Some(ErrorOption::Message(message)) => ErrorDescriptor::new().message(message),
        Some(ErrorOption::Descriptor(descriptor)) => descriptor,
    }
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, ArgusConfig::default());
    }

    #[test]
    fn test_loader_with_production() {
        let config = ConfigLoader::new().with_production().load().unwrap();
        assert_eq!(config.telemetry.logging.format, LogFormat::Json);
        assert!(config.telemetry.metrics.enabled);
    }

    #[test]
    fn test_loader_with_string_toml_descriptor() {
        let toml = r#"
            [bearer.error]
            code = 16
            metadata = { code = "INVALID_TOKEN" }
        "#;

        let config = ConfigLoader::new()
            .with_string(toml, "toml")
            .unwrap()
            .load()
            .unwrap();

        match config.bearer.error {
            Some(ErrorOption::Descriptor(descriptor)) => {
                assert!(descriptor.message.is_none());
                assert_eq!(descriptor.code, Some(16));
                assert_eq!(
                    descriptor.metadata.unwrap().get("code"),
                    Some("INVALID_TOKEN")
                );
            }
            other => panic!("Expected descriptor, got {other:?}"),
        }
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"bearer": {"error": "Unauthorized"}, "telemetry": {"service_name": "svc"}}"#;

        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.bearer.error, Some(ErrorOption::from("Unauthorized")));
        assert_eq!(config.telemetry.service_name, "svc");
    }

    #[test]
    fn test_loader_with_string_unsupported_format() {
        let result = ConfigLoader::new().with_string("error: x", "yaml");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_loader_with_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[bearer]\nerror = \"Token required\"").unwrap();

        let config = ConfigLoader::new()
            .with_file(file.path())
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.bearer.error, Some(ErrorOption::from("Token required")));
    }

    #[test]
    fn test_loader_with_file_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let result = ConfigLoader::new().with_file(file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/argus.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/argus.toml")
            .unwrap()
            .load()
            .unwrap();

        assert!(config.bearer.error.is_none());
    }

    #[test]
    fn test_loader_rejects_unknown_fields() {
        let result = ConfigLoader::new().with_string("[bearer]\nmessage = \"x\"", "toml");
        assert!(matches!(result, Err(ConfigError::TomlError(_))));
    }

    #[test]
    fn test_load_validates() {
        let result = ConfigLoader::new()
            .with_string("[telemetry.metrics]\nenabled = true\naddr = \"nowhere\"", "toml")
            .unwrap()
            .load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_loader_load_unvalidated() {
        let config = ConfigLoader::new()
            .with_string("[telemetry.logging]\nlevel = \"argus=shouting\"", "toml")
            .unwrap()
            .load_unvalidated();

        assert_eq!(config.telemetry.logging.level, "argus=shouting");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));

        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));

        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_apply_env_var_telemetry() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__TELEMETRY__SERVICE_NAME", "bearer-service", "TEST").unwrap();
        loader.apply_env_var("TEST__TELEMETRY__LOGGING__LEVEL", "debug", "TEST").unwrap();
        loader.apply_env_var("TEST__TELEMETRY__LOGGING__FORMAT", "pretty", "TEST").unwrap();
        loader.apply_env_var("TEST__TELEMETRY__METRICS__ENABLED", "yes", "TEST").unwrap();

        assert_eq!(loader.config.telemetry.service_name, "bearer-service");
        assert_eq!(loader.config.telemetry.logging.level, "debug");
        assert_eq!(loader.config.telemetry.logging.format, LogFormat::Pretty);
        assert!(loader.config.telemetry.metrics.enabled);
    }

    #[test]
    fn test_apply_env_var_bearer_message() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__BEARER__ERROR__MESSAGE", "Unauthorized", "TEST").unwrap();
        assert_eq!(loader.config.bearer.error, Some(ErrorOption::from("Unauthorized")));
    }

    #[test]
    fn test_apply_env_var_bearer_code_widens_message() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__BEARER__ERROR__MESSAGE", "Unauthorized", "TEST").unwrap();
        loader.apply_env_var("TEST__BEARER__ERROR__CODE", "16", "TEST").unwrap();

        assert_eq!(
            loader.config.bearer.error,
            Some(ErrorOption::from(
                ErrorDescriptor::new().message("Unauthorized").code(16)
            ))
        );
    }

    #[test]
    fn test_apply_env_var_bearer_metadata() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__BEARER__ERROR__METADATA__CODE", "INVALID_TOKEN", "TEST").unwrap();

        match loader.config.bearer.error {
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
    fn test_apply_env_var_message_keeps_descriptor_fields() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__BEARER__ERROR__CODE", "7", "TEST").unwrap();
        loader.apply_env_var("TEST__BEARER__ERROR__MESSAGE", "Denied", "TEST").unwrap();

        assert_eq!(
            loader.config.bearer.error,
            Some(ErrorOption::from(ErrorDescriptor::new().code(7).message("Denied")))
        );
    }

    #[test]
    fn test_apply_env_var_invalid_code() {
        let mut loader = ConfigLoader::new();
        let result = loader.apply_env_var("TEST__BEARER__ERROR__CODE", "sixteen", "TEST");
        assert!(matches!(result, Err(ConfigError::EnvParseError { .. })));
    }

    #[test]
    fn test_apply_env_var_ignores_foreign_keys() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST_HOME", "/tmp", "TEST").unwrap();
        loader.apply_env_var("TEST__UNKNOWN__KEY", "x", "TEST").unwrap();
        assert_eq!(loader.config, ArgusConfig::default());
    }

    #[test]
    fn test_env_overrides_applied_on_load() {
        // Unique prefix so parallel tests never see this variable.
        env::set_var("ARGUSLOADERTEST__BEARER__ERROR__MESSAGE", "From env");

        let config = ConfigLoader::new()
            .with_string("[bearer]\nerror = \"From file\"", "toml")
            .unwrap()
            .with_env_prefix("ARGUSLOADERTEST")
            .load()
            .unwrap();

        env::remove_var("ARGUSLOADERTEST__BEARER__ERROR__MESSAGE");
        assert_eq!(config.bearer.error, Some(ErrorOption::from("From env")));
    }
}
