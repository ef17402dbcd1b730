//! Test error types.

use argus_core::RpcError;
use thiserror::Error;

/// Errors that can occur while making a test call.
#[derive(Debug, Error)]
pub enum TestError {
    /// The call itself failed.
    #[error("call failed: {0}")]
    Rpc(#[from] RpcError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TestError {
    /// Returns the RPC error, if the call failed.
    #[must_use]
    pub const fn as_rpc(&self) -> Option<&RpcError> {
        match self {
            Self::Rpc(err) => Some(err),
            Self::Json(_) => None,
        }
    }
}
