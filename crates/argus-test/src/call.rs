//! Builder for a single test call.

use argus_core::metadata::AUTHORIZATION;
use argus_core::{CallContext, Metadata, RpcError, RpcResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::TestError;
use crate::service::TestService;

/// gRPC `UNIMPLEMENTED`.
const UNIMPLEMENTED: i32 = 12;

/// A call being built against a [`TestService`].
///
/// Created by [`TestService::call`]. Nothing runs until [`send`](Self::send).
#[derive(Debug)]
#[must_use = "a test call does nothing until sent"]
pub struct TestCall<'s> {
    service: &'s TestService,
    method: String,
    metadata: Metadata,
    request: Value,
}

impl<'s> TestCall<'s> {
    pub(crate) fn new(service: &'s TestService, method: String) -> Self {
        Self {
            service,
            method,
            metadata: Metadata::new(),
            request: Value::Null,
        }
    }

    /// Appends a metadata entry.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.append(key, value);
        self
    }

    /// Sets the raw `authorization` metadata value.
    pub fn authorization(mut self, value: impl Into<String>) -> Self {
        self.metadata.insert(AUTHORIZATION, value);
        self
    }

    /// Sets `authorization: Bearer <token>`.
    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.authorization(value)
    }

    /// Sets the request message.
    pub fn request(mut self, request: Value) -> Self {
        self.request = request;
        self
    }

    /// Sets the request message by serializing `value`.
    ///
    /// # Errors
    ///
    /// Returns [`TestError::Json`] if `value` cannot be serialized.
    pub fn json<T: Serialize>(self, value: &T) -> Result<Self, TestError> {
        let request = serde_json::to_value(value)?;
        Ok(self.request(request))
    }

    /// Runs the call through the method's chain and handler.
    ///
    /// The response is `null` when a stage completed the call without
    /// setting one.
    ///
    /// # Errors
    ///
    /// Returns the error raised by a stage or the handler, unchanged, or an
    /// `UNIMPLEMENTED` error for an unregistered method.
    pub async fn send(self) -> RpcResult<Value> {
        let Some(route) = self.service.route(&self.method) else {
            return Err(RpcError::new(format!("Method not found: {}", self.method))
                .with_code(UNIMPLEMENTED));
        };

        let mut ctx = CallContext::new(self.method)
            .with_metadata(self.metadata)
            .with_request(self.request);
        let handler = route.handler.clone();

        route
            .chain
            .call(&mut ctx, move |ctx| {
                Box::pin(async move {
                    let response = handler(&*ctx)?;
                    ctx.set_response(response);
                    Ok(())
                })
            })
            .await?;

        Ok(ctx.take_response().unwrap_or(Value::Null))
    }

    /// Runs the call and deserializes the response.
    ///
    /// # Errors
    ///
    /// Returns [`TestError::Rpc`] if the call fails and [`TestError::Json`]
    /// if the response does not deserialize into `T`.
    pub async fn send_as<T: DeserializeOwned>(self) -> Result<T, TestError> {
        let response = self.send().await?;
        Ok(serde_json::from_value(response)?)
    }
}
