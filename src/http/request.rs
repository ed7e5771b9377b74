//! Request handling and transformation.
//!
//! # Responsibilities
//! - Assign a request ID for log correlation
//! - Prepare the inbound header set for the outbound leg
//! - Decide whether the inbound request carries a body worth streaming
//!
//! # Design Decisions
//! - The request ID lives in request extensions and log spans only; it is
//!   never injected into forwarded or relayed headers
//! - An inbound `x-request-id` is reused so upstream and downstream logs line up

use std::fmt;

use axum::body::Body;
use axum::extract::Request;
use axum::http::header::{self, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::http::headers::strip_hop_by_hop;

/// Header carrying a caller-supplied request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Correlation ID for one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Fresh UUID v4 identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Take the caller's ID if present and printable, otherwise generate one.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| Self(v.to_string()))
            .unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access to the request ID stored by [`assign_request_id`].
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&RequestId>;
}

impl<B> RequestIdExt for axum::http::Request<B> {
    fn request_id(&self) -> Option<&RequestId> {
        self.extensions().get::<RequestId>()
    }
}

/// Middleware storing a [`RequestId`] in the request extensions.
pub async fn assign_request_id(mut request: Request, next: Next) -> Response {
    let id = RequestId::from_headers(request.headers());
    request.extensions_mut().insert(id);
    next.run(request).await
}

/// Build the header set sent upstream.
///
/// Everything end-to-end is kept, duplicates included. `Host` is dropped
/// unless `preserve_host` is set, so the client derives it from the target.
pub fn outbound_headers(inbound: &HeaderMap, preserve_host: bool) -> HeaderMap {
    let mut headers = inbound.clone();
    strip_hop_by_hop(&mut headers);
    if !preserve_host {
        headers.remove(header::HOST);
    }
    headers
}

/// Returns true if the inbound request announces a body.
///
/// Bodiless requests are forwarded without one so the upstream sees the
/// same framing (e.g. a plain `GET` does not turn into a chunked request).
pub fn carries_body(headers: &HeaderMap) -> bool {
    if headers.contains_key(header::TRANSFER_ENCODING) {
        return true;
    }

    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .is_some_and(|len| len > 0)
}

/// Convert the inbound body into a streaming outbound body.
pub fn outbound_body(body: Body) -> reqwest::Body {
    reqwest::Body::wrap_stream(body.into_data_stream())
}
