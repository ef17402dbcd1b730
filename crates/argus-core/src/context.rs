//! Call context types.
//!
//! The [`CallContext`] is the per-invocation handle that flows through the
//! middleware chain and into the method handler. It carries the call's
//! metadata, the decoded request, the response slot the handler fills in,
//! and typed extensions that middleware can use to pass data downstream.

use crate::metadata::Metadata;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

/// A unique identifier for each call, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for call tracking
/// and log correlation.
///
/// # Example
///
/// ```
/// use argus_core::CallId;
///
/// let id = CallId::new();
/// println!("Call ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(Uuid);

impl CallId {
    /// Creates a new unique call ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `CallId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CallId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-call context that flows through the middleware chain.
///
/// # Example
///
/// ```
/// use argus_core::CallContext;
/// use serde_json::json;
///
/// let mut ctx = CallContext::new("/BearerService/fn1")
///     .with_request(json!({ "message": "hello" }));
/// ctx.metadata_mut().append("Authorization", "Bearer 1111");
///
/// assert_eq!(ctx.method(), "/BearerService/fn1");
/// assert_eq!(ctx.metadata().get("authorization"), Some("Bearer 1111"));
/// assert!(ctx.response().is_none());
/// ```
#[derive(Debug)]
pub struct CallContext {
    /// Unique identifier for this call.
    call_id: CallId,

    /// Fully qualified method name, e.g. `/package.Service/Method`.
    method: String,

    /// Metadata sent by the caller.
    metadata: Metadata,

    /// The decoded request message.
    request: Value,

    /// The response message, set by the handler.
    response: Option<Value>,

    /// When the call started processing.
    started_at: Instant,

    /// Type-erased extension data.
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl CallContext {
    /// Creates a context for a call to `method` with empty metadata and a
    /// `null` request.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            call_id: CallId::new(),
            method: method.into(),
            metadata: Metadata::new(),
            request: Value::Null,
            response: None,
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Returns a context with the given metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns a context with the given request message.
    #[must_use]
    pub fn with_request(mut self, request: Value) -> Self {
        self.request = request;
        self
    }

    /// Returns a context with a specific call ID.
    ///
    /// Useful when the ID was propagated by an upstream service.
    #[must_use]
    pub fn with_call_id(mut self, call_id: CallId) -> Self {
        self.call_id = call_id;
        self
    }

    /// Returns the call ID.
    #[must_use]
    pub const fn call_id(&self) -> CallId {
        self.call_id
    }

    /// Returns the fully qualified method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the call metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the call metadata for modification.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Returns the request message.
    #[must_use]
    pub const fn request(&self) -> &Value {
        &self.request
    }

    /// Returns the response message, if the handler produced one.
    #[must_use]
    pub const fn response(&self) -> Option<&Value> {
        self.response.as_ref()
    }

    /// Sets the response message.
    pub fn set_response(&mut self, response: Value) {
        self.response = Some(response);
    }

    /// Takes the response message out of the context.
    pub fn take_response(&mut self) -> Option<Value> {
        self.response.take()
    }

    /// Returns when the call started processing.
    #[must_use]
    pub const fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the elapsed time since the call started.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Stores a typed extension value.
    ///
    /// # Example
    ///
    /// ```
    /// use argus_core::CallContext;
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Subject(String);
    ///
    /// let mut ctx = CallContext::new("/svc/m");
    /// ctx.set_extension(Subject("user-1".to_string()));
    ///
    /// assert_eq!(ctx.get_extension::<Subject>(), Some(&Subject("user-1".to_string())));
    /// ```
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Checks if an extension of the given type exists.
    #[must_use]
    pub fn has_extension<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_id_new_generates_unique_ids() {
        let id1 = CallId::new();
        let id2 = CallId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_call_id_display() {
        let display = CallId::new().to_string();
        assert_eq!(display.len(), 36);
        assert!(display.contains('-'));
    }

    #[test]
    fn test_call_id_serialization() {
        let id = CallId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: CallId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_new_context_is_empty() {
        let ctx = CallContext::new("/svc/method");
        assert_eq!(ctx.method(), "/svc/method");
        assert!(ctx.metadata().is_empty());
        assert_eq!(ctx.request(), &Value::Null);
        assert!(ctx.response().is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let call_id = CallId::new();
        let metadata: Metadata = [("foo", "bar")].into_iter().collect();
        let ctx = CallContext::new("/svc/method")
            .with_call_id(call_id)
            .with_metadata(metadata)
            .with_request(json!({ "message": "hello" }));

        assert_eq!(ctx.call_id(), call_id);
        assert_eq!(ctx.metadata().get("FOO"), Some("bar"));
        assert_eq!(ctx.request()["message"], "hello");
    }

    #[test]
    fn test_response_slot() {
        let mut ctx = CallContext::new("/svc/method");
        ctx.set_response(json!({ "message": "HELLO" }));
        assert_eq!(ctx.response(), Some(&json!({ "message": "HELLO" })));

        let taken = ctx.take_response();
        assert_eq!(taken, Some(json!({ "message": "HELLO" })));
        assert!(ctx.response().is_none());
    }

    #[test]
    fn test_extensions() {
        #[derive(Debug, Clone, PartialEq)]
        struct Token(String);

        let mut ctx = CallContext::new("/svc/method");
        assert!(!ctx.has_extension::<Token>());

        ctx.set_extension(Token("1111".to_string()));
        assert_eq!(ctx.get_extension::<Token>(), Some(&Token("1111".to_string())));

        let removed = ctx.remove_extension::<Token>();
        assert_eq!(removed, Some(Token("1111".to_string())));
        assert!(!ctx.has_extension::<Token>());
    }

    #[test]
    fn test_elapsed_time() {
        let ctx = CallContext::new("/svc/method");
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(ctx.elapsed() >= std::time::Duration::from_millis(10));
    }
}
