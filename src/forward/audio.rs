//! Audio file forwarding.

use axum::{
    http::{header, HeaderMap},
    response::Response,
};

use crate::error::ProxyError;
use crate::forward::{relay, user_agent, Upstream, AUDIO_ORIGIN};
use crate::resilience::with_header_timeout;
use crate::routing::normalize_target;
use crate::security::sanitize;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// The audio host rejects requests without this referrer.
const AUDIO_REFERER: &str = "https://www.kuwo.cn/";

/// Proxy `target` from the audio host.
///
/// `headers` and `path` come from the incoming request. A `Range` header
/// is forwarded verbatim so players can seek.
pub async fn proxy_audio(
    upstream: &Upstream,
    target: &str,
    headers: &HeaderMap,
    path: &str,
) -> Result<Response, ProxyError> {
    let url = normalize_target(target)?;

    let mut request = upstream
        .client()
        .get(url.clone())
        .header(header::USER_AGENT, user_agent(headers, DEFAULT_USER_AGENT))
        .header(header::REFERER, AUDIO_REFERER)
        .header(header::ORIGIN, AUDIO_ORIGIN);

    let range = headers.get(header::RANGE);
    if let Some(range) = range {
        request = request.header(header::RANGE, range.clone());
    }

    tracing::debug!(upstream_url = %url, range = ?range, "Fetching audio");

    let response = with_header_timeout(upstream.header_timeout(), request.send()).await?;

    tracing::debug!(upstream_url = %url, status = %response.status(), "Audio upstream responded");

    let client_headers = sanitize(response.headers(), path);
    Ok(relay(response, client_headers))
}
