//! Forwarding endpoint template and outbound request URL construction.
//!
//! Every fetch goes through a single configured proxy endpoint. The
//! endpoint is a base-URL template; the target URL is percent-encoded and
//! appended to it. The template is loaded once at startup and never
//! mutated by the engine.

use url::Url;

use crate::resolve::ResolveError;

/// Default forwarding endpoint used when no `proxy` setting is configured.
pub const DEFAULT_PROXY_ENDPOINT: &str =
    "https://feedback.googleusercontent.com/gadgets/proxy?container=fbk&url=";

/// The configured forwarding endpoint, immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct ProxyEndpoint {
    template: String,
}

impl ProxyEndpoint {
    /// Creates an endpoint from a template string.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ProxyNotConfigured`] when the template is
    /// empty. This is a setup failure, not a per-request error.
    pub fn new(template: impl Into<String>) -> Result<Self, ResolveError> {
        let template = template.into();
        if template.trim().is_empty() {
            return Err(ResolveError::ProxyNotConfigured);
        }
        Ok(Self { template })
    }

    /// Endpoint over [`DEFAULT_PROXY_ENDPOINT`].
    #[must_use]
    pub fn default_endpoint() -> Self {
        Self {
            template: DEFAULT_PROXY_ENDPOINT.to_string(),
        }
    }

    /// Returns the configured template string.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Builds the outbound request URL for a target.
    ///
    /// The full target URL, fragment included, is percent-encoded and
    /// appended to the template.
    #[must_use]
    pub fn wrap(&self, target: &Url) -> String {
        format!("{}{}", self.template, urlencoding::encode(target.as_str()))
    }
}
