//! Response relaying.
//!
//! # Responsibilities
//! - Copy the upstream status and end-to-end headers to the caller
//! - Stream the upstream body without buffering it
//!
//! # Design Decisions
//! - Content-Encoding is passed through untouched; the client never decodes
//! - Hop-by-hop headers stripped automatically
//! - A mid-body upstream failure surfaces as a body stream error, which
//!   aborts the transfer to the caller

use axum::body::Body;
use axum::response::Response;

use crate::http::headers::strip_hop_by_hop;

/// Turn an upstream response into the response sent to the caller.
pub fn relay(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
