//! Error types for resolution operations.
//!
//! Only terminal outcomes cross the component boundary: configuration
//! failures, malformed input, and transport-level failures. Upstream HTTP
//! errors are not errors at this level; they ride inside the delivered
//! messages so the display surface can render a diagnostic.

use thiserror::Error;

/// Errors that can occur while resolving a URL.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// No proxy endpoint is configured; fatal to the whole engine.
    #[error(
        "no proxy endpoint configured\n  Suggestion: Set `proxy` in the config file or pass --proxy"
    )]
    ProxyNotConfigured,

    /// The supplied string is not a parseable URL; no network activity
    /// occurred.
    #[error("'{input}' is not a valid URL: {reason}\n  Suggestion: {suggestion}")]
    MalformedInput {
        /// The input that failed to parse.
        input: String,
        /// Parser diagnostic.
        reason: String,
        /// How to fix the input.
        suggestion: String,
    },

    /// Transport failure on a negotiation round trip; aborts the current
    /// attempt only and is never auto-retried.
    #[error("network error fetching '{url}': {reason}\n  Suggestion: {suggestion}")]
    Network {
        /// The outbound request URL that failed.
        url: String,
        /// Transport diagnostic.
        reason: String,
        /// How to recover.
        suggestion: String,
    },
}

impl ResolveError {
    /// Creates a `MalformedInput` error.
    #[must_use]
    pub fn malformed_input(input: &str, reason: &str) -> Self {
        Self::MalformedInput {
            input: input.to_string(),
            reason: reason.to_string(),
            suggestion: "Check the address for typos and retry".to_string(),
        }
    }

    /// Creates a `Network` error.
    #[must_use]
    pub fn network(url: &str, reason: &str) -> Self {
        Self::Network {
            url: url.to_string(),
            reason: reason.to_string(),
            suggestion: "Check connectivity and the proxy endpoint, then retry".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_not_configured_message() {
        let msg = ResolveError::ProxyNotConfigured.to_string();
        assert!(msg.contains("no proxy endpoint"), "should name the failure");
        assert!(msg.contains("Suggestion"), "should have suggestion");
    }

    #[test]
    fn test_malformed_input_message() {
        let err = ResolveError::malformed_input("http://", "empty host");
        let msg = err.to_string();
        assert!(msg.contains("http://"), "should contain input");
        assert!(msg.contains("empty host"), "should contain reason");
        assert!(msg.contains("not a valid URL"));
    }

    #[test]
    fn test_network_error_message() {
        let err = ResolveError::network("https://proxy.example/?url=x", "connection refused");
        let msg = err.to_string();
        assert!(msg.contains("proxy.example"), "should contain url");
        assert!(msg.contains("connection refused"), "should contain reason");
        assert!(msg.contains("retry"), "suggestion should mention retry");
    }

    #[test]
    fn test_resolve_error_clone() {
        let err = ResolveError::malformed_input("not a url", "relative URL without a base");
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
