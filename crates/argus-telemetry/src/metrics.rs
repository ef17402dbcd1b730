//! Prometheus metrics for Argus.
//!
//! Recording goes through the `metrics` facade, so the `record_*` helpers are
//! no-ops until a recorder is installed with [`init_metrics`].
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `argus_calls_total` | Counter | `method`, `outcome` | Calls completed by the chain |
//! | `argus_auth_rejected_total` | Counter | `method`, `reason` | Calls rejected for a missing or malformed credential |
//! | `argus_auth_verified_total` | Counter | `method` | Credentials handed to the verifier |

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Calls completed by the chain.
pub const CALLS_TOTAL: &str = "argus_calls_total";

/// Calls rejected by the bearer stage before verification.
pub const AUTH_REJECTED_TOTAL: &str = "argus_auth_rejected_total";

/// Bearer credentials handed to the verifier.
pub const AUTH_VERIFIED_TOTAL: &str = "argus_auth_verified_total";

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,

    /// Address to expose metrics on (e.g., "0.0.0.0:9090").
    pub addr: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Installs the Prometheus recorder and starts its HTTP listener.
///
/// The listener runs on the current Tokio runtime if there is one, otherwise
/// on a background thread. Does nothing when `config.enabled` is false.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidAddress`] if `config.addr` is not a socket
/// address, and [`TelemetryError::MetricsInit`] if the recorder cannot be
/// installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::InvalidAddress(format!("{}: {e}", config.addr)))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    register_metric_descriptions();
    tracing::info!(%addr, "Prometheus metrics listener installed");

    Ok(())
}

fn register_metric_descriptions() {
    describe_counter!(CALLS_TOTAL, "Total number of calls completed by a middleware chain");
    describe_counter!(
        AUTH_REJECTED_TOTAL,
        "Calls rejected for a missing or malformed bearer credential"
    );
    describe_counter!(
        AUTH_VERIFIED_TOTAL,
        "Bearer credentials extracted and handed to the verifier"
    );
}

/// Records a completed call.
pub fn record_call(method: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    counter!(
        CALLS_TOTAL,
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Records a call rejected before verification.
///
/// `reason` is a stable label such as `missing` or `malformed`.
pub fn record_auth_rejected(method: &str, reason: &'static str) {
    counter!(
        AUTH_REJECTED_TOTAL,
        "method" => method.to_string(),
        "reason" => reason
    )
    .increment(1);
}

/// Records a credential handed to the verifier.
pub fn record_auth_verified(method: &str) {
    counter!(AUTH_VERIFIED_TOTAL, "method" => method.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetricsConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.addr, "0.0.0.0:9090");
    }

    #[test]
    fn test_disabled_metrics_skip_address_parsing() {
        let config = MetricsConfig {
            enabled: false,
            addr: "not-an-address".to_string(),
        };
        assert!(init_metrics(&config).is_ok());
    }

    #[test]
    fn test_invalid_address() {
        let config = MetricsConfig {
            enabled: true,
            addr: "not-an-address".to_string(),
        };
        let err = init_metrics(&config).unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidAddress(_)));
    }

    #[test]
    fn test_record_functions_dont_panic() {
        // No recorder installed: the facade drops the samples.
        record_call("/svc/m", true);
        record_call("/svc/m", false);
        record_auth_rejected("/svc/m", "missing");
        record_auth_verified("/svc/m");
    }
}
