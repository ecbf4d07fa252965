//! Upstream forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Route::Audio(target)
//!     → audio.rs (normalize target, GET audio host, forward Range)
//! Route::Api
//!     → api.rs (rewrite query onto API_BASE, GET JSON)
//! Both:
//!     → security::headers::sanitize
//!     → relay() streams the upstream body to the client
//! ```
//!
//! # Design Decisions
//! - One shared reqwest client per process
//! - Bodies are streamed chunk by chunk, never buffered
//! - Upstream status codes pass through untouched

pub mod api;
pub mod audio;

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue},
    response::Response,
};
use futures_util::TryStreamExt;
use url::Url;

use crate::config::TimeoutConfig;
use crate::error::InitError;

pub use api::proxy_api;
pub use audio::proxy_audio;

/// Replacement backend for every non-audio query.
pub const API_BASE: &str = "https://api.bugpk.com/api/music";

/// Site root the audio host expects as `Origin`.
pub const AUDIO_ORIGIN: &str = "https://www.kuwo.cn";

/// Shared upstream client and its fixed destinations.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: reqwest::Client,
    api_base: Url,
    header_timeout: Duration,
}

impl Upstream {
    /// Create an upstream from explicit parts.
    pub fn new(client: reqwest::Client, api_base: Url, header_timeout: Duration) -> Self {
        Self {
            client,
            api_base,
            header_timeout,
        }
    }

    /// Build the production upstream: [`API_BASE`] and the configured timeouts.
    pub fn from_config(timeouts: &TimeoutConfig) -> Result<Self, InitError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(InitError::Client)?;
        let api_base = Url::parse(API_BASE)?;

        Ok(Self::new(
            client,
            api_base,
            Duration::from_secs(timeouts.upstream_secs),
        ))
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn header_timeout(&self) -> Duration {
        self.header_timeout
    }
}

/// The caller's `User-Agent`, or `fallback` when absent or empty.
fn user_agent(headers: &HeaderMap, fallback: &'static str) -> HeaderValue {
    headers
        .get(header::USER_AGENT)
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(fallback))
}

/// Turn an upstream response into a client response with `headers`,
/// streaming the body through.
fn relay(upstream: reqwest::Response, headers: HeaderMap) -> Response {
    let status = upstream.status();
    let url = upstream.url().clone();
    let stream = upstream.bytes_stream().inspect_err(move |e| {
        tracing::warn!(upstream_url = %url, error = %e, "Upstream body stream aborted");
    });

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
