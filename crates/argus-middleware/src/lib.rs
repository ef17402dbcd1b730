//! # Argus Middleware
//!
//! Middleware chain and bearer authorization stage for Argus.
//!
//! A [`Chain`] runs every call through its stages in registration order and
//! then into the method handler. Each stage receives the mutable call
//! context and a [`Next`] continuation; a stage that returns without running
//! `next` ends the call right there.
//!
//! ```text
//! call → bearer → … → handler
//!          │
//!          └─ no valid credential → Err(Not Authorized)
//! ```
//!
//! ## Bearer Authorization
//!
//! The [`stages::bearer`] stage reads the `authorization` metadata field,
//! requires the form `Bearer <token>` (scheme case-insensitive) and passes the
//! token to a user-supplied verifier. What makes a token valid is left
//! entirely to the verifier.
//!
//! | Field value | Outcome |
//! |-------------|---------|
//! | absent or empty | rejected |
//! | `Bearer` / `Bearer ` / `Bearer1111` | rejected |
//! | `bearer 1111` | verifier called with `1111` |
//! | `Bearer a b` | rejected |
//!
//! ## Example
//!
//! ```
//! use argus_core::RpcError;
//! use argus_middleware::{bearer, BearerOptions, Chain};
//!
//! let chain = Chain::builder()
//!     .stage(bearer::bearer_with_options(
//!         BearerOptions::new().error("Unauthorized"),
//!         |token, ctx, next| {
//!             Box::pin(async move {
//!                 if token != "1111" {
//!                     return Err(RpcError::new("Invalid token"));
//!                 }
//!                 next.run(ctx).await
//!             })
//!         },
//!     ))
//!     .build();
//!
//! assert_eq!(chain.stage_names(), vec!["bearer"]);
//! ```

#![doc(html_root_url = "https://docs.rs/argus-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod middleware;
pub mod stages;

pub use stages::bearer;

// Re-export main types at crate root
pub use chain::{BoxedMiddleware, Chain, ChainBuilder};
pub use middleware::{BoxFuture, FnMiddleware, Middleware, Next};
pub use stages::bearer::{
    BearerMiddleware, BearerOptions, ErrorPolicy, InvalidCredential, VerifyToken,
    DEFAULT_ERROR_MESSAGE,
};
