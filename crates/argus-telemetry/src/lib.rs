//! Structured logging and Prometheus metrics for Argus.
//!
//! - **Logging**: `tracing-subscriber` with JSON or pretty output and an
//!   env-filter directive
//! - **Metrics**: counters through the `metrics` facade, exported by
//!   `metrics-exporter-prometheus`
//!
//! The middleware crates only emit `tracing` events and `metrics` samples;
//! call [`init_telemetry`] once at startup to route them somewhere.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `argus_calls_total` | Counter | `method`, `outcome` |
//! | `argus_auth_rejected_total` | Counter | `method`, `reason` |
//! | `argus_auth_verified_total` | Counter | `method` |
//!
//! # Example
//!
//! ```rust,ignore
//! use argus_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::builder()
//!     .service_name("bearer-service")
//!     .metrics_addr("0.0.0.0:9090")
//!     .build();
//!
//! init_telemetry(&config)?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

pub use config::{TelemetryConfig, TelemetryConfigBuilder};
pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use metrics::{init_metrics, MetricsConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging, then metrics.
///
/// # Errors
///
/// Returns `TelemetryError` if either subsystem fails to initialize.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<()> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;

    tracing::debug!(
        service.name = %config.service_name,
        environment = %config.environment,
        "Telemetry initialized"
    );
    Ok(())
}
