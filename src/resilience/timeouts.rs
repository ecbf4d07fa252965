//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound the wait for upstream response headers
//! - Keep body streaming unbounded so long audio downloads finish
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use crate::error::ProxyError;

/// Await an upstream send, failing with [`ProxyError::UpstreamTimeout`]
/// when `limit` elapses before the response headers arrive.
pub async fn with_header_timeout<F>(limit: Duration, send: F) -> Result<reqwest::Response, ProxyError>
where
    F: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    match tokio::time::timeout(limit, send).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(ProxyError::UpstreamTimeout(limit.as_secs())),
    }
}
