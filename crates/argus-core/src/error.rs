//! Error types for Argus.
//!
//! [`RpcError`] is the structured error raised back to the caller when a call
//! fails. Its message, numeric code and side-channel metadata are
//! independently inspectable so the transport can serialize each one into
//! its own wire representation (status message, status code, trailers).
//!
//! [`ErrorDescriptor`] and [`ErrorOption`] are the serializable shapes used
//! to configure which error a middleware raises.

use crate::metadata::Metadata;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`RpcError`].
pub type RpcResult<T> = Result<T, RpcError>;

/// Structured error returned to the caller of an RPC.
///
/// Fields that were not supplied are absent, not zero-filled: an error built
/// with [`RpcError::new`] has no code and no metadata.
///
/// # Example
///
/// ```
/// use argus_core::{Metadata, RpcError};
///
/// let metadata: Metadata = [("code", "INVALID_TOKEN")].into_iter().collect();
/// let err = RpcError::new("Not Authorized")
///     .with_code(16)
///     .with_metadata(metadata);
///
/// assert_eq!(err.message(), "Not Authorized");
/// assert_eq!(err.code(), Some(16));
/// assert_eq!(err.metadata().and_then(|m| m.get("code")), Some("INVALID_TOKEN"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RpcError {
    message: String,
    code: Option<i32>,
    metadata: Option<Metadata>,
}

impl RpcError {
    /// Creates an error carrying only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            metadata: None,
        }
    }

    /// Returns the error with a numeric status code.
    #[must_use]
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Returns the error with side-channel metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the numeric status code, if one was set.
    #[must_use]
    pub const fn code(&self) -> Option<i32> {
        self.code
    }

    /// Returns the side-channel metadata, if any was set.
    #[must_use]
    pub const fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }
}

/// Structured description of an error to raise.
///
/// Every field is optional; see the bearer middleware for how omitted fields
/// are filled in.
///
/// # Example
///
/// ```
/// use argus_core::ErrorDescriptor;
///
/// let descriptor: ErrorDescriptor =
///     serde_json::from_str(r#"{"metadata": {"code": "INVALID_TOKEN"}}"#).unwrap();
///
/// assert!(descriptor.message.is_none());
/// assert!(descriptor.code.is_none());
/// assert_eq!(
///     descriptor.metadata.as_ref().and_then(|m| m.get("code")),
///     Some("INVALID_TOKEN")
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorDescriptor {
    /// Error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Numeric status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,

    /// Side-channel metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ErrorDescriptor {
    /// Creates an empty descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the numeric code.
    #[must_use]
    pub fn code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Sets the metadata.
    #[must_use]
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Serializable error configuration: either a bare message or a descriptor.
///
/// In TOML this accepts both `error = "Unauthorized"` and
/// `error = { code = 16, metadata = { code = "INVALID_TOKEN" } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorOption {
    /// A plain error message.
    Message(String),
    /// Structured error fields.
    Descriptor(ErrorDescriptor),
}

impl From<String> for ErrorOption {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<&str> for ErrorOption {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<ErrorDescriptor> for ErrorOption {
    fn from(descriptor: ErrorDescriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}
