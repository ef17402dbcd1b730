//! Rejection error policy.
//!
//! Decides which [`RpcError`] the bearer stage raises when a call carries no
//! usable credential.

use argus_core::{CallContext, ErrorDescriptor, ErrorOption, RpcError};
use std::fmt;
use std::sync::Arc;

/// Message used when no other message is configured.
pub const DEFAULT_ERROR_MESSAGE: &str = "Not Authorized";

/// A function that builds the rejection error for a call.
pub type ErrorDeriver = Arc<dyn Fn(&CallContext) -> RpcError + Send + Sync>;

/// How the rejection error is produced.
///
/// | Policy | Raised error |
/// |--------|--------------|
/// | `Default` | message `Not Authorized`, no code, no metadata |
/// | `Message(m)` | message `m`, no code, no metadata |
/// | `Descriptor(d)` | `d.message` or the default, plus `d.code` and `d.metadata` if set |
/// | `Derive(f)` | whatever `f` returns for the call |
///
/// An empty message is treated as absent.
#[derive(Clone, Default)]
pub enum ErrorPolicy {
    /// Raise `Not Authorized`.
    #[default]
    Default,
    /// Raise an error with this message.
    Message(String),
    /// Raise an error built from these fields.
    Descriptor(ErrorDescriptor),
    /// Build the error from the call context.
    Derive(ErrorDeriver),
}

impl ErrorPolicy {
    /// Creates a policy that derives the error from the call context.
    ///
    /// # Example
    ///
    /// ```
    /// use argus_core::{CallContext, RpcError};
    /// use argus_middleware::stages::bearer::ErrorPolicy;
    ///
    /// let policy = ErrorPolicy::derive(|ctx| {
    ///     RpcError::new(format!("no credential for {}", ctx.method()))
    /// });
    ///
    /// let err = policy.resolve(&CallContext::new("/svc/m"));
    /// assert_eq!(err.message(), "no credential for /svc/m");
    /// ```
    pub fn derive<F>(f: F) -> Self
    where
        F: Fn(&CallContext) -> RpcError + Send + Sync + 'static,
    {
        Self::Derive(Arc::new(f))
    }

    /// Builds the rejection error for `ctx`.
    ///
    /// A deriver is invoked exactly once per call.
    #[must_use]
    pub fn resolve(&self, ctx: &CallContext) -> RpcError {
        match self {
            Self::Default => RpcError::new(DEFAULT_ERROR_MESSAGE),
            Self::Message(message) => RpcError::new(message_or_default(Some(message))),
            Self::Descriptor(descriptor) => {
                let mut err = RpcError::new(message_or_default(descriptor.message.as_deref()));
                if let Some(code) = descriptor.code {
                    err = err.with_code(code);
                }
                if let Some(metadata) = &descriptor.metadata {
                    err = err.with_metadata(metadata.clone());
                }
                err
            }
            Self::Derive(derive) => derive(ctx),
        }
    }
}

fn message_or_default(message: Option<&str>) -> &str {
    match message {
        Some(m) if !m.is_empty() => m,
        _ => DEFAULT_ERROR_MESSAGE,
    }
}

impl fmt::Debug for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Message(message) => f.debug_tuple("Message").field(message).finish(),
            Self::Descriptor(descriptor) => f.debug_tuple("Descriptor").field(descriptor).finish(),
            Self::Derive(_) => f.debug_tuple("Derive").field(&"<fn>").finish(),
        }
    }
}

impl From<ErrorOption> for ErrorPolicy {
    fn from(option: ErrorOption) -> Self {
        match option {
            ErrorOption::Message(message) => Self::Message(message),
            ErrorOption::Descriptor(descriptor) => Self::Descriptor(descriptor),
        }
    }
}

impl From<Option<ErrorOption>> for ErrorPolicy {
    fn from(option: Option<ErrorOption>) -> Self {
        option.map_or(Self::Default, Self::from)
    }
}

impl From<&str> for ErrorPolicy {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for ErrorPolicy {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<ErrorDescriptor> for ErrorPolicy {
    fn from(descriptor: ErrorDescriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}
