//! Core middleware trait and types.
//!
//! This module defines the [`Middleware`] trait that every stage of a call
//! chain implements. A middleware receives the mutable [`CallContext`] and a
//! [`Next`] continuation; it may inspect or enrich the context, delegate to
//! the rest of the chain by running `next`, or short-circuit by returning
//! without running it.
//!
//! # Example
//!
//! ```
//! use argus_core::{CallContext, RpcResult};
//! use argus_middleware::{BoxFuture, Middleware, Next};
//!
//! struct LoggingMiddleware;
//!
//! impl Middleware for LoggingMiddleware {
//!     fn name(&self) -> &'static str {
//!         "logging"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut CallContext,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, RpcResult<()>> {
//!         Box::pin(async move {
//!             tracing::info!(method = %ctx.method(), "call received");
//!             next.run(ctx).await
//!         })
//!     }
//! }
//! ```

use argus_core::{CallContext, RpcResult};
use std::future::Future;
use std::pin::Pin;

/// A boxed future, as returned by middleware and handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The core middleware trait.
///
/// # Invariants
///
/// - Middleware runs `next` at most once (it is consumed by [`Next::run`])
/// - Not running `next` short-circuits the chain; that is not an error
/// - Errors from downstream are returned as-is unless the middleware
///   deliberately handles them
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware stage.
    ///
    /// This name is used for logging, metrics, and debugging.
    fn name(&self) -> &'static str;

    /// Processes the call through this middleware.
    fn process<'a>(
        &'a self,
        ctx: &'a mut CallContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, RpcResult<()>>;
}

/// Terminal handler invoked after the last middleware.
type BoxedHandler<'a> = Box<
    dyn for<'c> FnOnce(&'c mut CallContext) -> BoxFuture<'c, RpcResult<()>> + Send + 'a,
>;

/// Continuation that invokes the rest of the chain.
///
/// Running it consumes it, so downstream stages execute at most once per
/// call. Dropping it without running skips the rest of the chain.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    /// More middleware to process
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    /// End of chain - invoke the handler
    Handler(BoxedHandler<'a>),
}

impl<'a> Next<'a> {
    /// Creates a `Next` that will invoke the given middleware.
    pub(crate) fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates a terminal `Next` that invokes `handler`.
    ///
    /// # Example
    ///
    /// ```
    /// use argus_core::CallContext;
    /// use argus_middleware::Next;
    /// use serde_json::json;
    ///
    /// # tokio_test::block_on(async {
    /// let mut ctx = CallContext::new("/svc/echo");
    /// let next = Next::handler(|ctx| {
    ///     Box::pin(async move {
    ///         ctx.set_response(json!({ "ok": true }));
    ///         Ok(())
    ///     })
    /// });
    ///
    /// next.run(&mut ctx).await.unwrap();
    /// assert_eq!(ctx.response(), Some(&json!({ "ok": true })));
    /// # });
    /// ```
    pub fn handler<F>(handler: F) -> Self
    where
        F: for<'c> FnOnce(&'c mut CallContext) -> BoxFuture<'c, RpcResult<()>> + Send + 'a,
    {
        Self {
            inner: NextInner::Handler(Box::new(handler)),
        }
    }

    /// Creates a terminal `Next` that completes successfully without
    /// touching the context.
    pub fn noop() -> Self {
        Self::handler(|_ctx| Box::pin(async { Ok(()) }))
    }

    /// Invokes the next middleware or handler in the chain.
    pub async fn run(self, ctx: &mut CallContext) -> RpcResult<()> {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(ctx, *next).await,
            NextInner::Handler(handler) => handler(ctx).await,
        }
    }
}

impl std::fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            NextInner::Chain { middleware, .. } => f
                .debug_struct("Next")
                .field("middleware", &middleware.name())
                .finish(),
            NextInner::Handler(_) => f.debug_struct("Next").field("handler", &"..").finish(),
        }
    }
}

/// A middleware built from a closure.
///
/// # Example
///
/// ```
/// use argus_middleware::FnMiddleware;
///
/// let middleware = FnMiddleware::new("stamp", |ctx, next| {
///     Box::pin(async move {
///         ctx.metadata_mut().insert("x-stamped", "yes");
///         next.run(ctx).await
///     })
/// });
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut CallContext, Next<'a>) -> BoxFuture<'a, RpcResult<()>>
        + Send
        + Sync
        + 'static,
{
    /// Creates a new function-based middleware.
    pub fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut CallContext, Next<'a>) -> BoxFuture<'a, RpcResult<()>>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut CallContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, RpcResult<()>> {
        (self.func)(ctx, next)
    }
}
