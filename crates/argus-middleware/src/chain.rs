//! Ordered middleware chain.
//!
//! A [`Chain`] holds the middleware registered for a method, in registration
//! order, and runs a call through them into the method handler. The chain is
//! immutable once built and can be shared across concurrent calls.
//!
//! ```text
//! call → stage 1 → stage 2 → … → handler
//! ```
//!
//! Each call runs inside an `rpc.call` span carrying the call ID and method
//! name, and its outcome is recorded in the `argus_calls_total` counter.

use crate::middleware::{BoxFuture, Middleware, Next};
use argus_core::{CallContext, RpcResult};
use argus_telemetry::metrics;
use std::sync::Arc;
use tracing::Instrument;

/// A type-erased middleware that can be stored in a chain.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An immutable, ordered middleware chain.
///
/// # Example
///
/// ```
/// use argus_core::CallContext;
/// use argus_middleware::{Chain, FnMiddleware};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let chain = Chain::builder()
///     .stage(FnMiddleware::new("stamp", |ctx, next| {
///         Box::pin(async move {
///             ctx.metadata_mut().insert("x-stamped", "yes");
///             next.run(ctx).await
///         })
///     }))
///     .build();
///
/// let mut ctx = CallContext::new("/svc/echo");
/// chain
///     .call(&mut ctx, |ctx| {
///         Box::pin(async move {
///             ctx.set_response(json!({ "ok": true }));
///             Ok(())
///         })
///     })
///     .await
///     .unwrap();
///
/// assert_eq!(ctx.metadata().get("x-stamped"), Some("yes"));
/// # });
/// ```
#[derive(Clone, Default)]
pub struct Chain {
    stages: Vec<BoxedMiddleware>,
}

impl Chain {
    /// Creates a new chain builder.
    #[must_use]
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    /// Runs a call through every stage and then `handler`.
    ///
    /// Returns the first error raised by a stage or by the handler, unchanged.
    pub async fn call<'a, H>(&'a self, ctx: &'a mut CallContext, handler: H) -> RpcResult<()>
    where
        H: for<'c> FnOnce(&'c mut CallContext) -> BoxFuture<'c, RpcResult<()>> + Send + 'a,
    {
        let method = ctx.method().to_string();
        let span = tracing::info_span!(
            "rpc.call",
            call_id = %ctx.call_id(),
            method = %method,
        );
        let next = self.build_chain(handler);

        async move {
            let result = next.run(ctx).await;
            let elapsed_ms = u64::try_from(ctx.elapsed().as_millis()).unwrap_or(u64::MAX);
            match &result {
                Ok(()) => tracing::debug!(elapsed_ms, "call completed"),
                Err(error) => tracing::debug!(elapsed_ms, error = %error, "call failed"),
            }
            metrics::record_call(&method, result.is_ok());
            result
        }
        .instrument(span)
        .await
    }

    /// Builds the continuation for a call, from back to front.
    fn build_chain<'a, H>(&'a self, handler: H) -> Next<'a>
    where
        H: for<'c> FnOnce(&'c mut CallContext) -> BoxFuture<'c, RpcResult<()>> + Send + 'a,
    {
        let mut next = Next::handler(handler);
        for middleware in self.stages.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }
        next
    }

    /// Returns the names of all stages in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|mw| mw.name()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the chain has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Builder for constructing a [`Chain`].
#[derive(Default)]
pub struct ChainBuilder {
    stages: Vec<BoxedMiddleware>,
}

impl ChainBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Appends a stage. Stages run in the order they are added.
    #[must_use]
    pub fn stage<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Arc::new(middleware));
        self
    }

    /// Appends an already shared stage.
    #[must_use]
    pub fn shared_stage(mut self, middleware: BoxedMiddleware) -> Self {
        self.stages.push(middleware);
        self
    }

    /// Builds the chain.
    #[must_use]
    pub fn build(self) -> Chain {
        Chain {
            stages: self.stages,
        }
    }
}
