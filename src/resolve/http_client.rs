//! Shared HTTP client construction policy for the engine.
//!
//! Centralizes networking defaults (timeouts, user-agent, compression) so
//! every negotiation round trip behaves the same. The client is built once
//! per [`crate::resolve::Engine`] and reused, taking advantage of
//! connection pooling.

use std::time::Duration;

use reqwest::Client;

/// Default connect timeout for negotiation round trips.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default read timeout; bodies are bounded page/resource payloads, not
/// long streams.
pub const READ_TIMEOUT_SECS: u64 = 30;

/// Shared User-Agent for all engine traffic.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("proxyview/{version}")
}

/// Builds the engine HTTP client using shared project policy.
///
/// # Panics
///
/// Panics if the HTTP client builder fails to build with the supplied
/// timeout configuration. This should never happen in practice.
#[must_use]
#[allow(clippy::expect_used)]
pub(crate) fn build_http_client(connect_timeout_secs: u64, read_timeout_secs: u64) -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(read_timeout_secs))
        .user_agent(default_user_agent())
        .gzip(true)
        .build()
        .expect("failed to build HTTP client with static configuration")
}
