//! Proxyview Core Library
//!
//! This library provides the resource resolution and content-negotiation
//! engine behind the proxyview tool, which turns an arbitrary user-supplied
//! URL into a typed, renderable payload fetched through a single forwarding
//! proxy endpoint.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`classify`] - URL-shape heuristics for the initial content category
//! - [`hsts`] - Static HSTS allow-list and scheme upgrade enforcement
//! - [`proxy`] - Forwarding endpoint template and target URL wrapping
//! - [`delivery`] - Typed delivery messages handed to the display surface
//! - [`resolve`] - The negotiation state machine and binary transfer path

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod delivery;
pub mod hsts;
pub mod proxy;
pub mod resolve;

// Re-export commonly used types
pub use classify::{ContentCategory, MediaCategory, classify_url};
pub use delivery::Delivery;
pub use hsts::{DEFAULT_HSTS_PATTERNS, HstsPolicy, HstsRule};
pub use proxy::{DEFAULT_PROXY_ENDPOINT, ProxyEndpoint};
pub use resolve::{
    AllowAllTransfers, Engine, LARGE_TRANSFER_THRESHOLD, Resolution, ResolveError, TransferGate,
};
