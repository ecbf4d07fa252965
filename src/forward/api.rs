//! API query forwarding to the replacement backend.

use axum::{
    http::{header, HeaderMap, HeaderValue, Uri},
    response::Response,
};
use url::{form_urlencoded, Url};

use crate::error::ProxyError;
use crate::forward::{relay, user_agent, Upstream};
use crate::resilience::with_header_timeout;
use crate::routing::TARGET_PARAM;
use crate::security::sanitize;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
const API_REFERER: &str = "https://www.kuwo.cn";
const JSON_CONTENT_TYPE: HeaderValue = HeaderValue::from_static("application/json; charset=utf-8");

/// Forward the incoming query to the replacement API.
pub async fn proxy_api(
    upstream: &Upstream,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<Response, ProxyError> {
    let url = build_api_url(upstream.api_base(), uri.query());

    tracing::debug!(upstream_url = %url, "Forwarding API query");

    let request = upstream
        .client()
        .get(url.clone())
        .header(header::USER_AGENT, user_agent(headers, DEFAULT_USER_AGENT))
        .header(header::ACCEPT, "application/json")
        .header(header::REFERER, API_REFERER);

    let response = with_header_timeout(upstream.header_timeout(), request.send()).await?;

    tracing::debug!(upstream_url = %url, status = %response.status(), "API upstream responded");

    let mut client_headers = sanitize(response.headers(), uri.path());
    if !client_headers.contains_key(header::CONTENT_TYPE) {
        client_headers.insert(header::CONTENT_TYPE, JSON_CONTENT_TYPE);
    }
    Ok(relay(response, client_headers))
}

/// Copy every query pair except `target` (any case) onto `base`.
///
/// A repeated key keeps its first position and takes its last value.
pub fn build_api_url(base: &Url, query: Option<&str>) -> Url {
    let mut pairs: Vec<(String, String)> = base.query_pairs().into_owned().collect();

    let incoming = query
        .map(|q| form_urlencoded::parse(q.as_bytes()))
        .into_iter()
        .flatten()
        .filter(|(key, _)| !key.eq_ignore_ascii_case(TARGET_PARAM));

    for (key, value) in incoming {
        match pairs.iter_mut().find(|(k, _)| k.as_str() == &*key) {
            Some(existing) => existing.1 = value.into_owned(),
            None => pairs.push((key.into_owned(), value.into_owned())),
        }
    }

    let mut url = base.clone();
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(&pairs);
    }
    url
}
