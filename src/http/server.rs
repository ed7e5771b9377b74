//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the forwarding handler
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener
//! - Rewrite the path and forward requests to the upstream
//! - Relay upstream responses back to the caller

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::error::{ForwardError, ServerError};
use crate::http::client::{Outbound, UpstreamClient};
use crate::http::request::{
    assign_request_id, carries_body, outbound_body, outbound_headers, RequestIdExt,
};
use crate::http::response::relay;
use crate::routing::PathRewrite;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub rewrite: Arc<PathRewrite>,
    pub client: UpstreamClient,
    pub preserve_host: bool,
}

/// HTTP server for the forwarder.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let state = AppState {
            rewrite: Arc::new(PathRewrite::from_config(&config.forwarding)),
            client: UpstreamClient::new(&config.timeouts)?,
            preserve_host: config.forwarding.preserve_host,
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let request_id = request
                .request_id()
                .map(ToString::to_string)
                .unwrap_or_default();
            tracing::info_span!(
                "request",
                request_id = %request_id,
                method = %request.method(),
                uri = %request.uri(),
            )
        });

        Router::new()
            .fallback(forward_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(middleware::from_fn(assign_request_id))
                    .layer(trace),
            )
    }

    /// The assembled router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a shutdown signal is received.
    ///
    /// In-flight requests are drained before returning.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            prefix = %self.config.forwarding.prefix,
            upstream = %self.config.forwarding.upstream_base,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Forwarding handler.
/// Rewrites the path, issues the outbound call and relays the response.
async fn forward_handler(State(state): State<AppState>, request: Request) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();

    let Some(url) = state
        .rewrite
        .target_url(request.uri().path(), request.uri().query())
    else {
        tracing::warn!(path = %request.uri().path(), peer = %peer, "Path outside forwarded prefix");
        return ForwardError::NoRoute(request.uri().path().to_string()).into_response();
    };

    let (parts, body) = request.into_parts();
    let outbound = Outbound {
        method: parts.method,
        headers: outbound_headers(&parts.headers, state.preserve_host),
        body: carries_body(&parts.headers).then(|| outbound_body(body)),
        url,
    };

    tracing::debug!(
        method = %outbound.method,
        target = %outbound.url,
        peer = %peer,
        "Forwarding request"
    );

    match state.client.send(outbound).await {
        Ok(upstream) => {
            tracing::debug!(status = %upstream.status(), "Upstream responded");
            relay(upstream)
        }
        Err(e) => {
            tracing::error!(error = %e, "Upstream error");
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let mut config = ProxyConfig::default();
        config.forwarding.upstream_base = "http://127.0.0.1:1/api".into();
        HttpServer::new(config).unwrap()
    }

    async fn status_of(server: &HttpServer, path: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[test]
    fn test_config_is_kept() {
        let server = server();
        assert_eq!(server.config().forwarding.prefix, "/api");
        assert_eq!(
            server.config().forwarding.upstream_base,
            "http://127.0.0.1:1/api"
        );
    }

    #[tokio::test]
    async fn test_unrouted_paths_are_not_found() {
        let server = server();
        for path in ["/health", "/api/../secret", "/api/%2e%2e/secret"] {
            let (status, body) = status_of(&server, path).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
            assert_eq!(body, r#"{"msg":"not found"}"#);
        }
    }

    #[tokio::test]
    async fn test_routed_path_reaches_client() {
        // Nothing listens on port 1, so the outbound call fails.
        let (status, _) = status_of(&server(), "/api/login").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
