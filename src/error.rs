//! Request-time errors and their client-facing responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors raised while serving a single request.
///
/// Upstream error statuses are not errors here: a 404 or 500 from the
/// upstream host is relayed to the client as-is.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The `target` parameter is not a URL on the audio host.
    #[error("Invalid kuwo url")]
    InvalidTarget,

    /// Upstream did not send response headers within the configured deadline.
    #[error("Upstream timed out after {0} seconds")]
    UpstreamTimeout(u64),

    /// Connection, DNS or TLS failure talking to upstream.
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl ProxyError {
    /// Status code returned to the client for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidTarget => StatusCode::BAD_REQUEST,
            ProxyError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::Upstream(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match status {
            StatusCode::BAD_REQUEST => "Invalid kuwo url",
            StatusCode::GATEWAY_TIMEOUT => "Upstream timed out",
            _ => "Upstream request failed",
        };
        (status, body).into_response()
    }
}

/// Errors raised while building the server at startup.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to build upstream client: {0}")]
    Client(reqwest::Error),

    #[error("invalid API base URL: {0}")]
    ApiBase(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_target_response() {
        let response = ProxyError::InvalidTarget.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; charset=utf-8"
        );
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Invalid kuwo url");
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        assert_eq!(
            ProxyError::UpstreamTimeout(30).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }
}
