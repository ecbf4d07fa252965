//! Audio host matching.
//!
//! # Design Decisions
//! - Host matching is case-insensitive (DNS names are)
//! - Exact domain or any subdomain of it, nothing else
//! - No regex: a suffix check on a label boundary

/// The audio host whose files are proxied.
pub const AUDIO_HOST: AudioHostMatcher = AudioHostMatcher::new("kuwo.cn");

/// Matches a hostname against a domain and all of its subdomains.
#[derive(Debug, Clone, Copy)]
pub struct AudioHostMatcher {
    domain: &'static str,
}

impl AudioHostMatcher {
    /// Create a matcher for `domain`, which must be lowercase.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// The domain this matcher accepts.
    pub fn domain(&self) -> &'static str {
        self.domain
    }

    /// Returns true if `host` is the domain itself or one of its subdomains.
    pub fn matches(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        match host.strip_suffix(self.domain) {
            Some("") => true,
            Some(prefix) => prefix.ends_with('.'),
            None => false,
        }
    }
}
