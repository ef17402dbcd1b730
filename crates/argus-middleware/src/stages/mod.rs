//! Built-in middleware stages.
//!
//! - [`bearer`] - Require a `Bearer <token>` credential and verify it

pub mod bearer;

// Re-export main types
pub use bearer::{BearerMiddleware, BearerOptions, ErrorPolicy, VerifyToken};
