//! Resource resolution engine: fetch, negotiate, deliver.
//!
//! This module ties the leaf components together into the resolution
//! pipeline: scheme defaulting and URL validation, HSTS upgrade, proxy
//! wrapping, the content-negotiation state machine, and the size-gated
//! binary transfer path.
//!
//! # Architecture
//!
//! - [`Engine`] - Shared, immutable resolution front end
//! - [`NegotiationAttempt`] - Request-scoped state machine (one per resolution)
//! - [`TransferGate`] - Confirmation seam for large binary payloads
//! - [`Resolution`] - Terminal outcome: delivered messages or a user-cancel
//! - [`ResolveError`] - Setup, input, and transport failures
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use proxyview_core::proxy::ProxyEndpoint;
//! use proxyview_core::resolve::{AllowAllTransfers, Engine};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Engine::new(ProxyEndpoint::default_endpoint(), Arc::new(AllowAllTransfers));
//! let resolution = engine.resolve("wikipedia.org").await?;
//! for message in resolution.messages() {
//!     println!("{}", message.kind());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod http_client;
mod negotiate;
mod transfer;

pub use error::ResolveError;
pub use http_client::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use negotiate::{Decision, DeclaredCategory, NegotiationAttempt, Step, decide};
pub use transfer::{
    AllowAllTransfers, LARGE_TRANSFER_THRESHOLD, TransferGate, requires_confirmation,
    transcode_to_data_url,
};

use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info, instrument, trace, warn};
use url::Url;

use crate::classify::{ContentCategory, MediaCategory, classify_url};
use crate::delivery::Delivery;
use crate::hsts::HstsPolicy;
use crate::proxy::ProxyEndpoint;

use http_client::build_http_client;

/// Inputs with an explicit scheme; everything else gets `http://` prepended
/// before parsing (never assume secure transport by default).
#[allow(clippy::expect_used)]
static SCHEME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+://").expect("scheme pattern is valid"));

/// Terminal outcome of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Messages for the display surface, in delivery order.
    Delivered(Vec<Delivery>),
    /// The user declined a large binary transfer. Not an error; nothing is
    /// delivered.
    Cancelled,
}

impl Resolution {
    /// The delivered messages; empty for a cancelled resolution.
    #[must_use]
    pub fn messages(&self) -> &[Delivery] {
        match self {
            Self::Delivered(messages) => messages,
            Self::Cancelled => &[],
        }
    }

    /// Returns true when the user declined a large transfer.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Shared resolution front end.
///
/// Holds only process-wide immutable state (HTTP client, proxy endpoint,
/// HSTS policy, transfer gate) and takes `&self`, so any number of
/// resolutions may run concurrently. There is no cancellation primitive:
/// an in-flight negotiation runs to completion even if superseded, and the
/// caller is responsible for discarding stale results.
pub struct Engine {
    client: Client,
    proxy: ProxyEndpoint,
    hsts: HstsPolicy,
    gate: Arc<dyn TransferGate>,
}

impl Engine {
    /// Creates an engine with default timeouts and the default HSTS
    /// allow-list.
    #[must_use]
    pub fn new(proxy: ProxyEndpoint, gate: Arc<dyn TransferGate>) -> Self {
        Self::with_timeouts(proxy, gate, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates an engine with explicit HTTP timeout values.
    #[must_use]
    pub fn with_timeouts(
        proxy: ProxyEndpoint,
        gate: Arc<dyn TransferGate>,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Self {
        Self {
            client: build_http_client(connect_timeout_secs, read_timeout_secs),
            proxy,
            hsts: HstsPolicy::default(),
            gate,
        }
    }

    /// Replaces the HSTS allow-list.
    #[must_use]
    pub fn with_hsts_policy(mut self, policy: HstsPolicy) -> Self {
        self.hsts = policy;
        self
    }

    /// Resolves a navigation-style link into an `href` message without
    /// fetching.
    ///
    /// Fragment-only links pass through verbatim for same-document anchor
    /// scrolling; everything else is scheme-defaulted, validated, and HSTS
    /// upgraded.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MalformedInput`] when the link is not a
    /// parseable URL.
    pub fn navigate(&self, link: &str) -> Result<Delivery, ResolveError> {
        if link.starts_with('#') {
            return Ok(Delivery::Href {
                url: link.to_string(),
            });
        }
        let target = self.parse_target(link)?;
        Ok(Delivery::Href {
            url: target.to_string(),
        })
    }

    /// Resolves a URL whose content type is unknown; the classifier picks
    /// the initial assumed category.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MalformedInput`] for unparseable input and
    /// [`ResolveError::Network`] for a transport failure on any round trip.
    #[instrument(skip(self))]
    pub async fn resolve(&self, input: &str) -> Result<Resolution, ResolveError> {
        self.resolve_inner(input, None).await
    }

    /// Resolves a URL whose content category the caller already knows,
    /// skipping classification.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MalformedInput`] for unparseable input and
    /// [`ResolveError::Network`] for a transport failure on any round trip.
    #[instrument(skip(self))]
    pub async fn resolve_as(
        &self,
        input: &str,
        category: ContentCategory,
    ) -> Result<Resolution, ResolveError> {
        self.resolve_inner(input, Some(category)).await
    }

    async fn resolve_inner(
        &self,
        input: &str,
        declared: Option<ContentCategory>,
    ) -> Result<Resolution, ResolveError> {
        // Navigation shortcut: same-document anchors are never fetched.
        if input.starts_with('#') {
            trace!(input, "fragment-only input forwarded as navigation");
            return Ok(Resolution::Delivered(vec![Delivery::Href {
                url: input.to_string(),
            }]));
        }

        let target = self.parse_target(input)?;
        let assumed = declared.unwrap_or_else(|| classify_url(target.as_str()));
        let request_url = self.proxy.wrap(&target);
        debug!(target = %target, assumed = %assumed, "resolution started");

        if let Some(media) = assumed.as_media() {
            // Media guesses are delivered by reference without a round
            // trip; the display surface loads them natively.
            return Ok(media_resolution(media, request_url));
        }

        self.negotiate(NegotiationAttempt::new(target, assumed), &request_url)
            .await
    }

    /// Runs the fetch loop: one round trip per state until a terminal step.
    async fn negotiate(
        &self,
        mut attempt: NegotiationAttempt,
        request_url: &str,
    ) -> Result<Resolution, ResolveError> {
        loop {
            debug!(
                assumed = %attempt.assumed(),
                attempt_count = attempt.attempt_count(),
                "issuing negotiation round trip"
            );
            let response = self
                .client
                .get(request_url)
                .send()
                .await
                .map_err(|e| ResolveError::network(request_url, &e.to_string()))?;

            let status = response.status();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(ToOwned::to_owned);

            match attempt.apply(decide(attempt.assumed(), content_type.as_deref())) {
                Step::Refetch => {
                    trace!(assumed = %attempt.assumed(), "retransition; discarding response");
                }
                Step::ShortCircuit(media) => {
                    debug!(category = %media, "short-circuit accept by reference");
                    return Ok(media_resolution(media, request_url.to_string()));
                }
                Step::Accept(category) => {
                    return self
                        .deliver(&attempt, category, status, content_type, response, request_url)
                        .await;
                }
            }
        }
    }

    /// Payload handling for an accepted response.
    async fn deliver(
        &self,
        attempt: &NegotiationAttempt,
        category: ContentCategory,
        status: StatusCode,
        content_type: Option<String>,
        response: Response,
        request_url: &str,
    ) -> Result<Resolution, ResolveError> {
        if !status.is_success() {
            // Upstream HTTP errors do not abort: deliver the error and the
            // body as a diagnostic document.
            warn!(status = status.as_u16(), "upstream HTTP error on accepted attempt");
            let body = read_text(response, request_url).await?;
            let mut messages = vec![Delivery::Error {
                status: Some(status.as_u16()),
                message: status
                    .canonical_reason()
                    .unwrap_or("upstream HTTP error")
                    .to_string(),
            }];
            messages.push(Delivery::Document { markup: body });
            push_fragment_navigation(attempt, &mut messages);
            return Ok(Resolution::Delivered(messages));
        }

        match category {
            ContentCategory::Document => {
                let markup = read_text(response, request_url).await?;
                let mut messages = vec![Delivery::Document { markup }];
                push_fragment_navigation(attempt, &mut messages);
                Ok(Resolution::Delivered(messages))
            }
            ContentCategory::Binary => {
                let payload = response
                    .bytes()
                    .await
                    .map_err(|e| ResolveError::network(request_url, &e.to_string()))?;
                let size = payload.len() as u64;
                if requires_confirmation(size)
                    && !self
                        .gate
                        .confirm_large_transfer(attempt.target().as_str(), size)
                        .await
                {
                    info!(size, "large transfer declined by user");
                    return Ok(Resolution::Cancelled);
                }
                let mime = content_type.as_deref().unwrap_or("application/octet-stream");
                Ok(Resolution::Delivered(vec![Delivery::Resource {
                    data_url: transcode_to_data_url(mime, &payload),
                }]))
            }
            // Media acceptance is always by reference.
            ContentCategory::Image => {
                Ok(media_resolution(MediaCategory::Image, request_url.to_string()))
            }
            ContentCategory::Audio => {
                Ok(media_resolution(MediaCategory::Audio, request_url.to_string()))
            }
            ContentCategory::Video => {
                Ok(media_resolution(MediaCategory::Video, request_url.to_string()))
            }
        }
    }

    /// Scheme defaulting, parsing, and HSTS upgrade for raw input.
    fn parse_target(&self, input: &str) -> Result<Url, ResolveError> {
        let normalized = if SCHEME_PATTERN.is_match(input) {
            input.to_string()
        } else {
            format!("http://{input}")
        };
        let url = Url::parse(&normalized)
            .map_err(|e| ResolveError::malformed_input(input, &e.to_string()))?;
        if url.host_str().is_none() {
            return Err(ResolveError::malformed_input(input, "missing host"));
        }
        Ok(self.hsts.upgrade(url))
    }
}

fn media_delivery(media: MediaCategory, url: String) -> Delivery {
    match media {
        MediaCategory::Image => Delivery::Image { url },
        MediaCategory::Audio => Delivery::Audio { url },
        MediaCategory::Video => Delivery::Video { url },
    }
}

fn media_resolution(media: MediaCategory, url: String) -> Resolution {
    Resolution::Delivered(vec![media_delivery(media, url)])
}

/// Appends the follow-up in-page navigation for a fragment-bearing target.
fn push_fragment_navigation(attempt: &NegotiationAttempt, messages: &mut Vec<Delivery>) {
    if let Some(fragment) = attempt.target().fragment()
        && !fragment.is_empty()
    {
        messages.push(Delivery::Href {
            url: format!("#{fragment}"),
        });
    }
}

async fn read_text(response: Response, request_url: &str) -> Result<String, ResolveError> {
    response
        .text()
        .await
        .map_err(|e| ResolveError::network(request_url, &e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::new(ProxyEndpoint::default_endpoint(), Arc::new(AllowAllTransfers))
    }

    #[test]
    fn test_parse_target_prepends_http_scheme() {
        let target = engine().parse_target("example.com").unwrap();
        assert_eq!(target.as_str(), "http://example.com/");
    }

    #[test]
    fn test_parse_target_keeps_explicit_scheme() {
        let target = engine().parse_target("https://example.com/a").unwrap();
        assert_eq!(target.as_str(), "https://example.com/a");
    }

    #[test]
    fn test_parse_target_applies_hsts() {
        let target = engine().parse_target("http://en.wikipedia.org/wiki/URL").unwrap();
        assert_eq!(target.scheme(), "https");
    }

    #[test]
    fn test_parse_target_rejects_malformed() {
        let err = engine().parse_target("http://").unwrap_err();
        assert!(matches!(err, ResolveError::MalformedInput { .. }));
    }

    #[test]
    fn test_navigate_forwards_fragment_verbatim() {
        let message = engine().navigate("#top").unwrap();
        assert_eq!(
            message,
            Delivery::Href {
                url: "#top".to_string()
            }
        );
    }

    #[test]
    fn test_navigate_normalizes_and_upgrades() {
        let message = engine().navigate("github.com/a/b").unwrap();
        assert_eq!(
            message,
            Delivery::Href {
                url: "https://github.com/a/b".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_fragment_input_skips_network() {
        // No proxy or server exists; a fragment input must still resolve.
        let resolution = engine().resolve("#section-2").await.unwrap();
        assert_eq!(
            resolution.messages(),
            &[Delivery::Href {
                url: "#section-2".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_resolve_malformed_input_is_synchronous() {
        let err = engine().resolve("http://").await.unwrap_err();
        assert!(matches!(err, ResolveError::MalformedInput { .. }));
    }

    #[tokio::test]
    async fn test_resolve_media_guess_delivers_reference_without_fetch() {
        // The proxy endpoint points nowhere reachable; a media-classified
        // URL must still deliver a reference message.
        let engine = Engine::new(
            ProxyEndpoint::new("https://proxy.invalid/?url=").unwrap(),
            Arc::new(AllowAllTransfers),
        );
        let resolution = engine.resolve("example.com/photo.png").await.unwrap();
        let messages = resolution.messages();
        assert_eq!(messages.len(), 1);
        match &messages[0] {
            Delivery::Image { url } => {
                assert!(url.starts_with("https://proxy.invalid/?url="));
                assert!(url.contains("photo.png"));
            }
            other => panic!("expected image delivery, got {other:?}"),
        }
    }

    #[test]
    fn test_default_timeouts_are_public_contract() {
        // CLI fallbacks reference these; changing them changes observable
        // network behavior for every caller of `Engine::new`.
        assert_eq!(CONNECT_TIMEOUT_SECS, 10);
        assert_eq!(READ_TIMEOUT_SECS, 30);
    }

    #[test]
    fn test_resolution_cancelled_has_no_messages() {
        let resolution = Resolution::Cancelled;
        assert!(resolution.is_cancelled());
        assert!(resolution.messages().is_empty());
    }
}
