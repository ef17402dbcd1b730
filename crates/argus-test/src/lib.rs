//! # Argus Test
//!
//! In-memory test harness for Argus middleware chains.
//!
//! A [`TestService`] maps method names to a [`Chain`](argus_middleware::Chain)
//! and a handler. [`TestService::call`] returns a [`TestCall`] builder that
//! carries metadata and a request message through the chain exactly as a
//! server would, without any transport.
//!
//! ## Example
//!
//! ```
//! use argus_core::RpcError;
//! use argus_middleware::{bearer, Chain};
//! use argus_test::TestService;
//! use serde_json::json;
//!
//! let chain = Chain::builder()
//!     .stage(bearer::bearer(|token, ctx, next| {
//!         Box::pin(async move {
//!             if token != "1111" {
//!                 return Err(RpcError::new("Invalid token"));
//!             }
//!             next.run(ctx).await
//!         })
//!     }))
//!     .build();
//!
//! let service = TestService::new().method("/BearerService/fn1", chain, |ctx| {
//!     let message = ctx.request()["message"].as_str().unwrap_or_default();
//!     Ok(json!({ "message": message.to_uppercase() }))
//! });
//!
//! tokio_test::block_on(async {
//!     let response = service
//!         .call("/BearerService/fn1")
//!         .bearer_token("1111")
//!         .request(json!({ "message": "hello" }))
//!         .send()
//!         .await
//!         .unwrap();
//!     assert_eq!(response, json!({ "message": "HELLO" }));
//!
//!     let err = service.call("/BearerService/fn1").send().await.unwrap_err();
//!     assert_eq!(err.message(), "Not Authorized");
//! });
//! ```

mod call;
mod error;
mod service;

pub use call::TestCall;
pub use error::TestError;
pub use service::{TestHandler, TestService};
