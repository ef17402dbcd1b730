//! # Argus
//!
//! **Bearer authorization middleware for RPC call chains**
//!
//! Argus pulls a `Bearer <token>` credential out of each call's
//! `authorization` metadata and hands the token to your verifier. Calls
//! without a usable credential are rejected with a configurable error before
//! any verification or handler code runs.
//!
//! ## Quick Start
//!
//! ```
//! use argus::prelude::*;
//! use serde_json::json;
//!
//! let config = ArgusConfig::default();
//! let chain = Chain::builder()
//!     .stage(argus::bearer_from_config(&config, |token, ctx, next| {
//!         Box::pin(async move {
//!             if token != "1111" {
//!                 return Err(RpcError::new("Invalid token"));
//!             }
//!             next.run(ctx).await
//!         })
//!     }))
//!     .build();
//!
//! # tokio_test::block_on(async {
//! let mut ctx = CallContext::new("/BearerService/fn1");
//! ctx.metadata_mut().append("authorization", "Bearer 1111");
//! chain
//!     .call(&mut ctx, |ctx| {
//!         Box::pin(async move {
//!             ctx.set_response(json!({ "message": "HELLO" }));
//!             Ok(())
//!         })
//!     })
//!     .await
//!     .unwrap();
//! assert_eq!(ctx.response(), Some(&json!({ "message": "HELLO" })));
//! # });
//! ```
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`core`] | Metadata, call context, error types |
//! | [`middleware`] | Middleware trait, chains, the bearer stage |
//! | [`config`] | Typed configuration and the layered loader |
//! | [`telemetry`] | Logging and Prometheus metrics initialization |

#![doc(html_root_url = "https://docs.rs/argus/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use argus_config as config;
pub use argus_core as core;
pub use argus_middleware as middleware;
pub use argus_telemetry as telemetry;

use argus_config::ArgusConfig;
use argus_core::{CallContext, RpcResult};
use argus_middleware::{bearer, BearerMiddleware, BearerOptions, BoxFuture, Next};

/// Builds a bearer stage whose rejection error comes from `config.bearer`.
///
/// Without a configured error the stage rejects with `Not Authorized`.
pub fn bearer_from_config<F>(config: &ArgusConfig, verify: F) -> BearerMiddleware
where
    F: for<'a> Fn(String, &'a mut CallContext, Next<'a>) -> BoxFuture<'a, RpcResult<()>>
        + Send
        + Sync
        + 'static,
{
    let options = BearerOptions::from(config.bearer.error.clone());
    bearer::bearer_with_options(options, verify)
}

/// Initializes logging and metrics from `config.telemetry`.
///
/// Call once at startup, before the first call is served.
///
/// # Errors
///
/// Returns an error if the log filter is invalid, a global subscriber or
/// recorder is already installed, or the metrics address does not parse.
pub fn init(config: &ArgusConfig) -> argus_telemetry::TelemetryResult<()> {
    argus_telemetry::init_telemetry(&config.telemetry.to_telemetry_config())?;
    tracing::info!(
        service = %config.telemetry.service_name,
        environment = %config.telemetry.environment,
        "argus initialized"
    );
    Ok(())
}

/// Prelude module for convenient imports.
///
/// ```
/// use argus::prelude::*;
/// ```
pub mod prelude {
    pub use argus_config::{ArgusConfig, ConfigLoader};
    pub use argus_core::{
        CallContext, CallId, ErrorDescriptor, ErrorOption, Metadata, RpcError, RpcResult,
    };
    pub use argus_middleware::{
        BearerMiddleware, BearerOptions, BoxFuture, Chain, ChainBuilder, ErrorPolicy,
        FnMiddleware, Middleware, Next, VerifyToken,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_config::BearerConfig;
    use argus_core::{ErrorDescriptor, ErrorOption, Metadata, RpcError};
    use argus_middleware::Chain;
    use argus_test::TestService;
    use serde_json::json;

    fn service(config: &ArgusConfig) -> TestService {
        let chain = Chain::builder()
            .stage(bearer_from_config(config, |token, ctx, next| {
                Box::pin(async move {
                    if token != "1111" {
                        return Err(RpcError::new("Invalid token"));
                    }
                    next.run(ctx).await
                })
            }))
            .build();

        TestService::new().method("/BearerService/fn1", chain, |_ctx| Ok(json!({ "ok": true })))
    }

    #[tokio::test]
    async fn test_default_config_rejects_with_default_message() {
        let service = service(&ArgusConfig::default());
        let err = service.call("/BearerService/fn1").send().await.unwrap_err();
        assert_eq!(err.message(), "Not Authorized");
    }

    #[tokio::test]
    async fn test_configured_message() {
        let config = ArgusConfig::builder()
            .bearer(BearerConfig {
                error: Some(ErrorOption::from("Unauthorized")),
            })
            .build();

        let err = service(&config)
            .call("/BearerService/fn1")
            .authorization("Basic 1111")
            .send()
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Unauthorized");
    }

    #[tokio::test]
    async fn test_configured_descriptor() {
        let mut metadata = Metadata::new();
        metadata.insert("code", "INVALID_TOKEN");
        let config = ArgusConfig::builder()
            .bearer(BearerConfig {
                error: Some(ErrorOption::from(
                    ErrorDescriptor::new().code(16).metadata(metadata),
                )),
            })
            .build();

        let err = service(&config)
            .call("/BearerService/fn1")
            .send()
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Not Authorized");
        assert_eq!(err.code(), Some(16));
        assert_eq!(err.metadata().unwrap().get("code"), Some("INVALID_TOKEN"));
    }

    #[tokio::test]
    async fn test_valid_token_passes() {
        let response = service(&ArgusConfig::default())
            .call("/BearerService/fn1")
            .bearer_token("1111")
            .send()
            .await
            .unwrap();
        assert_eq!(response, json!({ "ok": true }));
    }
}
