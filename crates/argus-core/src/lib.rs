//! # Argus Core
//!
//! Core call types for the Argus middleware stack.
//!
//! This crate provides the foundational types every other Argus crate
//! builds on:
//!
//! - [`Metadata`] - Case-insensitive, multi-valued call metadata
//! - [`CallContext`] - Per-call context carrying metadata, payloads and extensions
//! - [`CallId`] - UUID v7 call identifier
//! - [`RpcError`] - Structured error with message, code and metadata
//! - [`ErrorDescriptor`] / [`ErrorOption`] - Serializable error configuration

#![doc(html_root_url = "https://docs.rs/argus-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
pub mod metadata;

pub use context::{CallContext, CallId};
pub use error::{ErrorDescriptor, ErrorOption, RpcError, RpcResult};
pub use metadata::Metadata;
