//! Response header sanitization and CORS headers.
//!
//! # Responsibilities
//! - Copy only allow-listed upstream headers into a fresh map
//! - Add permissive CORS headers to every proxied response
//! - Synthesize `Cache-Control` when upstream sent none
//!
//! # Design Decisions
//! - Build a new map instead of deleting from the upstream one
//! - The cache decision reads the unfiltered upstream headers, since
//!   `server` never survives the allow-list

use axum::http::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    StatusCode,
};
use axum::response::{IntoResponse, Response};

use crate::routing::AUDIO_HOST;

/// Upstream headers allowed through to the client.
pub const SAFE_HEADERS: [HeaderName; 9] = [
    header::CONTENT_TYPE,
    header::CACHE_CONTROL,
    header::ACCEPT_RANGES,
    header::CONTENT_LENGTH,
    header::CONTENT_RANGE,
    header::ETAG,
    header::LAST_MODIFIED,
    header::EXPIRES,
    header::DATE,
];

pub const ALLOW_ORIGIN: HeaderValue = HeaderValue::from_static("*");
pub const ALLOW_METHODS: HeaderValue = HeaderValue::from_static("GET, HEAD, OPTIONS");
pub const ALLOW_HEADERS: HeaderValue = HeaderValue::from_static("*");
pub const PREFLIGHT_MAX_AGE: HeaderValue = HeaderValue::from_static("86400");

pub const CACHE_IMMUTABLE: HeaderValue =
    HeaderValue::from_static("public, max-age=31536000, immutable");
pub const CACHE_NO_STORE: HeaderValue = HeaderValue::from_static("no-store");

/// Build the client header set from upstream response headers.
///
/// `request_path` is the path of the incoming client request; a path
/// containing `/url` selects the long-lived cache policy.
pub fn sanitize(upstream: &HeaderMap, request_path: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in upstream {
        if SAFE_HEADERS.contains(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    insert_cors(&mut headers);

    if !headers.contains_key(header::CACHE_CONTROL) {
        let policy = if is_immutable_content(upstream, request_path) {
            CACHE_IMMUTABLE
        } else {
            CACHE_NO_STORE
        };
        headers.insert(header::CACHE_CONTROL, policy);
    }

    headers
}

fn is_immutable_content(upstream: &HeaderMap, request_path: &str) -> bool {
    if request_path.contains("/url") {
        return true;
    }
    upstream
        .get(header::SERVER)
        .and_then(|v| v.to_str().ok())
        .map(|server| AUDIO_HOST.matches(server))
        .unwrap_or(false)
}

fn insert_cors(headers: &mut HeaderMap) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN);
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS);
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS);
}

/// `204 No Content` answer to a CORS preflight. No sanitization applies.
pub fn preflight_response() -> Response {
    let mut headers = HeaderMap::new();
    insert_cors(&mut headers);
    headers.insert(header::ACCESS_CONTROL_MAX_AGE, PREFLIGHT_MAX_AGE);
    (StatusCode::NO_CONTENT, headers).into_response()
}
