//! HTTP client for the outbound leg.
//!
//! One pooled `reqwest` client is shared by all requests. It never follows
//! redirects, never consults proxy environment variables and never decodes
//! response bodies, so the upstream exchange is relayed as-is.

use std::time::Duration;

use axum::http::{HeaderMap, Method};
use tokio::time;

use crate::config::TimeoutConfig;
use crate::error::ForwardError;

/// Outbound request, ready to send.
#[derive(Debug)]
pub struct Outbound {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<reqwest::Body>,
}

/// Client forwarding requests to the upstream.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    response_timeout: Duration,
}

impl UpstreamClient {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            response_timeout: Duration::from_secs(timeouts.response_secs),
        })
    }

    /// Issue the outbound call and wait for the response headers.
    ///
    /// The body is left streaming; only the wait for headers is bounded.
    pub async fn send(&self, outbound: Outbound) -> Result<reqwest::Response, ForwardError> {
        let mut builder = self
            .client
            .request(outbound.method, outbound.url)
            .headers(outbound.headers);
        if let Some(body) = outbound.body {
            builder = builder.body(body);
        }
        let request = builder.build()?;

        match time::timeout(self.response_timeout, self.client.execute(request)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ForwardError::Timeout(self.response_timeout.as_secs())),
        }
    }
}
