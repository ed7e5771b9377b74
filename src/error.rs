//! Forwarding errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Everything that can go wrong while forwarding a single request.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("path '{0}' is outside the forwarded prefix")]
    NoRoute(String),

    #[error("could not build upstream request: {0}")]
    InvalidTarget(String),

    #[error("upstream unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("upstream did not respond within {0}s")]
    Timeout(u64),
}

impl ForwardError {
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::NoRoute(_) => StatusCode::NOT_FOUND,
            ForwardError::InvalidTarget(_) | ForwardError::Unreachable(_) => {
                StatusCode::BAD_GATEWAY
            }
            ForwardError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<reqwest::Error> for ForwardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ForwardError::InvalidTarget(err.to_string())
        } else {
            ForwardError::Unreachable(err)
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ForwardError::NoRoute(_) => (status, Json(json!({"msg": "not found"}))).into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}

/// Startup failures of the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
