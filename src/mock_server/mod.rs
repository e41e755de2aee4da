//! Mock probe target for E2E testing.
//!
//! The dispatcher talks to arbitrary third-party endpoints; this module
//! provides an in-process stand-in for them so end-to-end tests can
//! exercise real HTTP without leaving the machine. Unlike wiremock, which
//! mocks per-test expectations, this server offers a fixed httpbin-style
//! surface (JSON, text, image, arbitrary status codes, a parameterized
//! path) and records every request it serves.
//!
//! # Example
//!
//! ```ignore
//! use apidex::mock_server::MockServer;
//! use apidex::{Dispatcher, ResponseKind};
//!
//! #[tokio::test]
//! async fn test_probe() {
//!     let server = MockServer::start().await;
//!     let dispatcher = Dispatcher::new().unwrap();
//!
//!     let outcome = dispatcher
//!         .dispatch(&format!("{}/json", server.url()), &ResponseKind::Json)
//!         .await;
//!     assert!(outcome.is_success());
//!
//!     server.shutdown().await;
//! }
//! ```

mod server;

pub use server::MockServer;
