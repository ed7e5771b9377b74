//! Path-rewriting HTTP forwarder library.
//!
//! Strips a fixed prefix from inbound request paths, forwards the request to
//! a fixed upstream base URL with the same method, headers and body, and
//! streams the upstream response back unchanged.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use error::ForwardError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::PathRewrite;
