//! Request classification.
//!
//! # Responsibilities
//! - Decide, from method and query alone, which path serves a request
//! - Extract the audio `target` parameter
//!
//! # Design Decisions
//! - Pure function of the request line; no state, no I/O
//! - Method check happens before any query inspection
//! - `target` key is matched exactly; the first occurrence wins

use axum::http::{Method, Uri};
use url::form_urlencoded;

/// Query parameter naming the upstream audio URL.
pub const TARGET_PARAM: &str = "target";

/// Where a request is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// CORS preflight, answered locally.
    Preflight,
    /// Method outside GET, HEAD, OPTIONS.
    MethodNotAllowed,
    /// Proxy the given raw target to the audio host.
    Audio(String),
    /// Forward the query to the replacement API.
    Api,
}

/// Classify a request by method and `target` parameter.
pub fn classify(method: &Method, uri: &Uri) -> Route {
    if method == Method::OPTIONS {
        return Route::Preflight;
    }
    if method != Method::GET && method != Method::HEAD {
        return Route::MethodNotAllowed;
    }

    match target_param(uri) {
        Some(target) if !target.is_empty() => Route::Audio(target),
        _ => Route::Api,
    }
}

/// The decoded value of the first `target` query pair, if any.
pub fn target_param(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == TARGET_PARAM)
        .map(|(_, value)| value.into_owned())
}
