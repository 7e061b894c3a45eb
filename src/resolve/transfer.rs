//! Size-gated binary transfer path.
//!
//! Payloads accepted as generic binary are transcoded into a
//! self-contained `data:` URL so the display surface can embed or download
//! them without a second fetch. Large payloads first pass through the
//! [`TransferGate`] confirmation seam; declining is a silent user-cancel,
//! not an error.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Payload size, in bytes, at which the caller must confirm the transfer.
pub const LARGE_TRANSFER_THRESHOLD: u64 = 9_000_000;

/// Returns true when a payload of this size requires explicit confirmation.
#[must_use]
pub fn requires_confirmation(size: u64) -> bool {
    size >= LARGE_TRANSFER_THRESHOLD
}

/// Confirmation seam for large binary transfers.
///
/// The CLI prompts the user; display surfaces supply their own dialogs;
/// tests stub the answer.
///
/// # Object Safety
///
/// Uses `async_trait` so the engine can hold `Arc<dyn TransferGate>`.
#[async_trait]
pub trait TransferGate: Send + Sync {
    /// Asks whether a payload of `size` bytes from `url` should be
    /// delivered. Returning false cancels delivery with no payload and no
    /// error.
    async fn confirm_large_transfer(&self, url: &str, size: u64) -> bool;
}

/// Gate that approves every transfer, for callers that impose no limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllTransfers;

#[async_trait]
impl TransferGate for AllowAllTransfers {
    async fn confirm_large_transfer(&self, _url: &str, _size: u64) -> bool {
        true
    }
}

/// Transcodes a binary payload into an inline-transferable `data:` URL.
#[must_use]
pub fn transcode_to_data_url(content_type: &str, payload: &[u8]) -> String {
    let mime = content_type.trim();
    let mime = if mime.is_empty() {
        "application/octet-stream"
    } else {
        mime
    };
    format!("data:{mime};base64,{}", STANDARD.encode(payload))
}
