//! Static HSTS allow-list and scheme upgrade enforcement.
//!
//! This is a local policy decision, not a live HSTS cache: a fixed set of
//! domain patterns is consulted and matching `http` URLs are rewritten to
//! `https` before they ever reach the network. No network check is
//! performed.

use tracing::debug;
use url::Url;

/// Domains known to serve HTTPS for all subdomains.
///
/// `*.` patterns match the bare domain and any dot-separated subdomain;
/// patterns without `*.` match only the identical host.
pub const DEFAULT_HSTS_PATTERNS: [&str; 5] = [
    "*.wikipedia.org",
    "*.twitter.com",
    "*.github.com",
    "*.facebook.com",
    "*.torproject.org",
];

/// A single domain pattern in the HSTS allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HstsRule {
    /// Matches only the identical host.
    Exact(String),
    /// Matches the bare domain and any dot-separated subdomain.
    Subdomains(String),
}

impl HstsRule {
    /// Parses a pattern string into a rule (`*.domain.tld` or exact host).
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_prefix("*.") {
            Some(domain) => Self::Subdomains(domain.to_ascii_lowercase()),
            None => Self::Exact(pattern.to_ascii_lowercase()),
        }
    }

    /// Returns true if the rule matches the given host.
    ///
    /// Matching is anchored at both ends: `wikipedia.org.evil.example` does
    /// not match `*.wikipedia.org`.
    #[must_use]
    pub fn matches(&self, host: &str) -> bool {
        match self {
            Self::Exact(domain) => host.eq_ignore_ascii_case(domain),
            Self::Subdomains(domain) => {
                let host = host.to_ascii_lowercase();
                host == *domain || host.ends_with(&format!(".{domain}"))
            }
        }
    }
}

/// The read-only HSTS allow-list applied to navigation-style URLs.
#[derive(Debug, Clone)]
pub struct HstsPolicy {
    rules: Vec<HstsRule>,
}

impl HstsPolicy {
    /// Builds a policy from domain pattern strings.
    #[must_use]
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rules: patterns
                .into_iter()
                .map(|p| HstsRule::parse(p.as_ref()))
                .collect(),
        }
    }

    /// Returns the number of rules in the allow-list.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if any rule matches the host.
    #[must_use]
    pub fn is_upgradable(&self, host: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(host))
    }

    /// Upgrades an insecure URL to `https` when its host matches the
    /// allow-list; all other URLs pass through unchanged.
    ///
    /// Pure over (URL, allow-list) and idempotent: an already-secure URL is
    /// returned as-is.
    #[must_use]
    pub fn upgrade(&self, mut url: Url) -> Url {
        if url.scheme() != "http" {
            return url;
        }
        let matched = url.host_str().is_some_and(|host| self.is_upgradable(host));
        if matched {
            debug!(url = %url, "HSTS upgrade to https");
            // http -> https is always a valid scheme change
            let _ = url.set_scheme("https");
        }
        url
    }
}

impl Default for HstsPolicy {
    /// Policy over [`DEFAULT_HSTS_PATTERNS`].
    fn default() -> Self {
        Self::new(DEFAULT_HSTS_PATTERNS)
    }
}
