//! In-memory service for driving middleware chains in tests.

use std::collections::HashMap;
use std::sync::Arc;

use argus_core::{CallContext, RpcResult};
use argus_middleware::Chain;
use serde_json::Value;

use crate::call::TestCall;

/// A unary method handler.
///
/// Handlers see the full context, so they can read extensions set by
/// earlier stages as well as the request message.
pub type TestHandler = Arc<dyn Fn(&CallContext) -> RpcResult<Value> + Send + Sync>;

#[derive(Clone)]
pub(crate) struct Route {
    pub(crate) chain: Chain,
    pub(crate) handler: TestHandler,
}

/// A set of methods, each with its own middleware chain and handler.
///
/// Calls never touch the network: [`TestCall::send`] builds a
/// [`CallContext`] and runs it straight through the method's chain.
///
/// # Example
///
/// ```
/// use argus_middleware::Chain;
/// use argus_test::TestService;
/// use serde_json::json;
///
/// let service = TestService::new().method("/Echo/echo", Chain::builder().build(), |ctx| {
///     Ok(ctx.request().clone())
/// });
///
/// let response = tokio_test::block_on(
///     service.call("/Echo/echo").request(json!({ "message": "hi" })).send(),
/// );
/// assert_eq!(response.unwrap(), json!({ "message": "hi" }));
/// ```
#[derive(Clone, Default)]
pub struct TestService {
    routes: HashMap<String, Route>,
}

impl TestService {
    /// Creates a service with no methods.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `method`, replacing any earlier registration.
    #[must_use]
    pub fn method<F>(mut self, method: impl Into<String>, chain: Chain, handler: F) -> Self
    where
        F: Fn(&CallContext) -> RpcResult<Value> + Send + Sync + 'static,
    {
        self.routes.insert(
            method.into(),
            Route {
                chain,
                handler: Arc::new(handler),
            },
        );
        self
    }

    /// Starts building a call to `method`.
    #[must_use]
    pub fn call(&self, method: impl Into<String>) -> TestCall<'_> {
        TestCall::new(self, method.into())
    }

    /// Returns the registered method names, sorted.
    #[must_use]
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    pub(crate) fn route(&self, method: &str) -> Option<&Route> {
        self.routes.get(method)
    }
}

impl std::fmt::Debug for TestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestService")
            .field("methods", &self.methods())
            .finish()
    }
}
