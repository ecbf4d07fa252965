//! Audio target validation and normalization.

use url::Url;

use crate::error::ProxyError;
use crate::routing::matcher::AUDIO_HOST;

/// Validate a caller-supplied audio URL and force it onto plain HTTP.
///
/// Fails with [`ProxyError::InvalidTarget`] when `raw` is not an absolute
/// URL, when its host is not on the audio host, or when its scheme cannot
/// be switched to `http`.
pub fn normalize_target(raw: &str) -> Result<Url, ProxyError> {
    let mut url = Url::parse(raw).map_err(|_| ProxyError::InvalidTarget)?;

    let host_ok = url
        .host_str()
        .map(|host| AUDIO_HOST.matches(host))
        .unwrap_or(false);
    if !host_ok {
        return Err(ProxyError::InvalidTarget);
    }

    // The audio CDN serves almost everything over plain http.
    url.set_scheme("http").map_err(|_| ProxyError::InvalidTarget)?;
    Ok(url)
}
