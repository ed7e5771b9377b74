//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing span)
//!     → routing (prefix match, target URL)
//!     → request.rs (outbound headers and body)
//!     → client.rs (single outbound call)
//!     → response.rs (status, headers, streamed body)
//!     → Send to client
//! ```

pub mod client;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use client::UpstreamClient;
pub use request::{RequestId, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
