//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → rewrite.rs (prefix match, strip once)
//!     → Return: target URL or NoMatch
//! ```
//!
//! # Design Decisions
//! - A single rule compiled at startup, immutable at runtime
//! - Prefix matching only, no regex in the hot path
//! - Deterministic: same input always yields the same target

pub mod rewrite;

pub use rewrite::PathRewrite;
