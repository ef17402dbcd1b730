//! Bearer authorization stage.
//!
//! Reads the `authorization` metadata field of each call, requires it to be
//! `Bearer <token>` and hands the token to a user-supplied verifier. A call
//! without a usable credential is rejected with the configured
//! [`ErrorPolicy`] and never reaches the verifier or anything downstream.
//!
//! What a valid token means is entirely up to the verifier: it continues the
//! chain by running `next`, or rejects the call by returning an error.
//!
//! # Example
//!
//! ```
//! use argus_core::{CallContext, RpcError};
//! use argus_middleware::{stages::bearer, Chain};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let chain = Chain::builder()
//!     .stage(bearer::bearer(|token, ctx, next| {
//!         Box::pin(async move {
//!             if token != "1111" {
//!                 return Err(RpcError::new("Invalid token"));
//!             }
//!             next.run(ctx).await
//!         })
//!     }))
//!     .build();
//!
//! let mut ctx = CallContext::new("/BearerService/fn1");
//! ctx.metadata_mut().append("Authorization", "Bearer 1111");
//!
//! chain
//!     .call(&mut ctx, |ctx| {
//!         Box::pin(async move {
//!             ctx.set_response(json!({ "message": "HELLO" }));
//!             Ok(())
//!         })
//!     })
//!     .await
//!     .unwrap();
//!
//! let mut ctx = CallContext::new("/BearerService/fn1");
//! let err = chain
//!     .call(&mut ctx, |_ctx| Box::pin(async { Ok(()) }))
//!     .await
//!     .unwrap_err();
//! assert_eq!(err.message(), "Not Authorized");
//! # });
//! ```

mod policy;
mod scheme;

pub use policy::{ErrorDeriver, ErrorPolicy, DEFAULT_ERROR_MESSAGE};
pub use scheme::{parse_bearer, Credential, InvalidCredential, BEARER_SCHEME};

use crate::middleware::{BoxFuture, Middleware, Next};
use argus_core::{metadata::AUTHORIZATION, CallContext, ErrorOption, RpcError, RpcResult};
use argus_telemetry::metrics;
use std::sync::Arc;

/// Verifies a bearer token and decides whether the call continues.
///
/// Implemented for any closure of the form
/// `|token, ctx, next| Box::pin(async move { ... })`.
pub trait VerifyToken: Send + Sync + 'static {
    /// Verifies `token`. Run `next` to continue the chain, return an error to
    /// reject the call.
    fn verify<'a>(
        &'a self,
        token: String,
        ctx: &'a mut CallContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, RpcResult<()>>;
}

impl<F> VerifyToken for F
where
    F: for<'a> Fn(String, &'a mut CallContext, Next<'a>) -> BoxFuture<'a, RpcResult<()>>
        + Send
        + Sync
        + 'static,
{
    fn verify<'a>(
        &'a self,
        token: String,
        ctx: &'a mut CallContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, RpcResult<()>> {
        self(token, ctx, next)
    }
}

/// Options for the bearer stage.
#[derive(Debug, Clone, Default)]
pub struct BearerOptions {
    error: ErrorPolicy,
}

impl BearerOptions {
    /// Creates options with the default rejection error.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rejection error policy.
    ///
    /// Accepts a message, an [`argus_core::ErrorDescriptor`], an
    /// [`ErrorOption`] or a full [`ErrorPolicy`].
    #[must_use]
    pub fn error(mut self, error: impl Into<ErrorPolicy>) -> Self {
        self.error = error.into();
        self
    }

    /// Derives the rejection error from the call context.
    #[must_use]
    pub fn error_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&CallContext) -> RpcError + Send + Sync + 'static,
    {
        self.error = ErrorPolicy::derive(f);
        self
    }

    /// Returns the rejection error policy.
    #[must_use]
    pub const fn error_policy(&self) -> &ErrorPolicy {
        &self.error
    }
}

impl From<Option<ErrorOption>> for BearerOptions {
    fn from(error: Option<ErrorOption>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Middleware that requires a bearer credential on every call.
pub struct BearerMiddleware {
    error: ErrorPolicy,
    verifier: Arc<dyn VerifyToken>,
}

impl BearerMiddleware {
    /// Creates the stage with the default rejection error.
    pub fn new<F>(verify: F) -> Self
    where
        F: for<'a> Fn(String, &'a mut CallContext, Next<'a>) -> BoxFuture<'a, RpcResult<()>>
            + Send
            + Sync
            + 'static,
    {
        Self::from_verifier(BearerOptions::default(), verify)
    }

    /// Creates the stage with explicit options.
    pub fn with_options<F>(options: BearerOptions, verify: F) -> Self
    where
        F: for<'a> Fn(String, &'a mut CallContext, Next<'a>) -> BoxFuture<'a, RpcResult<()>>
            + Send
            + Sync
            + 'static,
    {
        Self::from_verifier(options, verify)
    }

    /// Creates the stage from any [`VerifyToken`] implementation.
    pub fn from_verifier<V: VerifyToken>(options: BearerOptions, verifier: V) -> Self {
        Self {
            error: options.error,
            verifier: Arc::new(verifier),
        }
    }

    /// Returns the rejection error policy.
    #[must_use]
    pub const fn error_policy(&self) -> &ErrorPolicy {
        &self.error
    }
}

impl std::fmt::Debug for BearerMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerMiddleware")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl Middleware for BearerMiddleware {
    fn name(&self) -> &'static str {
        "bearer"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut CallContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, RpcResult<()>> {
        Box::pin(async move {
            let token = match parse_bearer(ctx.metadata().get(AUTHORIZATION)) {
                Ok(credential) => credential.token().to_owned(),
                Err(reason) => {
                    tracing::debug!(
                        method = %ctx.method(),
                        reason = %reason,
                        "Rejecting call without a valid bearer credential"
                    );
                    metrics::record_auth_rejected(ctx.method(), reason.as_str());
                    return Err(self.error.resolve(ctx));
                }
            };

            // Never log the token itself.
            tracing::trace!(method = %ctx.method(), "Bearer credential extracted");
            metrics::record_auth_verified(ctx.method());

            self.verifier.verify(token, ctx, next).await
        })
    }
}

/// Creates a bearer stage with the default rejection error.
pub fn bearer<F>(verify: F) -> BearerMiddleware
where
    F: for<'a> Fn(String, &'a mut CallContext, Next<'a>) -> BoxFuture<'a, RpcResult<()>>
        + Send
        + Sync
        + 'static,
{
    BearerMiddleware::new(verify)
}

/// Creates a bearer stage with explicit options.
pub fn bearer_with_options<F>(options: BearerOptions, verify: F) -> BearerMiddleware
where
    F: for<'a> Fn(String, &'a mut CallContext, Next<'a>) -> BoxFuture<'a, RpcResult<()>>
        + Send
        + Sync
        + 'static,
{
    BearerMiddleware::with_options(options, verify)
}
