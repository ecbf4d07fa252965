//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with a single catch-all handler
//! - Wire up middleware (request ID, tracing)
//! - Classify each request and hand it to a forwarding path
//! - Map request-time errors to client responses

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::error::{InitError, ProxyError};
use crate::forward::{proxy_api, proxy_audio, Upstream};
use crate::http::request::{make_span, request_id_layer};
use crate::routing::{classify, Route};
use crate::security::preflight_response;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Upstream,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a server talking to the production upstreams.
    pub fn new(config: ProxyConfig) -> Result<Self, InitError> {
        let upstream = Upstream::from_config(&config.timeouts)?;
        Ok(Self::with_upstream(config, upstream))
    }

    /// Create a server with an explicit upstream.
    pub fn with_upstream(config: ProxyConfig, upstream: Upstream) -> Self {
        let router = Self::build_router(AppState { upstream });
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(make_span::<Body>)),
            )
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
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

/// Catch-all handler: classify, then answer locally or forward.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, _body) = request.into_parts();
    let route = classify(&parts.method, &parts.uri);

    tracing::debug!(route = ?route, "Dispatching request");

    let result = match route {
        Route::Preflight => return preflight_response(),
        Route::MethodNotAllowed => {
            return (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response();
        }
        Route::Audio(target) => {
            proxy_audio(&state.upstream, &target, &parts.headers, parts.uri.path()).await
        }
        Route::Api => proxy_api(&state.upstream, &parts.uri, &parts.headers).await,
    };

    result.unwrap_or_else(|e| {
        match &e {
            ProxyError::InvalidTarget => tracing::warn!(error = %e, "Rejected audio target"),
            _ => tracing::error!(error = %e, "Upstream error"),
        }
        e.into_response()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tower::ServiceExt;
    use url::Url;

    fn server() -> HttpServer {
        // Nothing here reaches the network.
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let upstream = Upstream::new(
            client,
            Url::parse("http://127.0.0.1:9/api/music").unwrap(),
            Duration::from_secs(1),
        );
        HttpServer::with_upstream(ProxyConfig::default(), upstream)
    }

    async fn send(method: &str, uri: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        server().router().oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let response = send("OPTIONS", "/any/path?target=whatever").await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()["access-control-allow-methods"],
            "GET, HEAD, OPTIONS"
        );
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["access-control-max-age"], "86400");
        assert!(!response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_post_not_allowed() {
        let response = send("POST", "/").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_text(response).await, "Method Not Allowed");

        let response = send("DELETE", "/song?target=http://kuwo.cn/a.mp3").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_invalid_target_rejected() {
        let response = send("GET", "/?target=https%3A%2F%2Fexample.com%2Fa.mp3").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Invalid kuwo url");

        let response = send("GET", "/?target=not%20a%20url").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unreachable_api_is_bad_gateway() {
        let response = send("GET", "/?type=search").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_text(response).await, "Upstream request failed");
    }
}
