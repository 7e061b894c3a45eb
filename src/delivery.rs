//! Typed delivery messages handed to the display surface.
//!
//! One resolution produces one or more of these messages. The engine never
//! renders anything itself; the display surface consumes the tagged JSON
//! representation and decides how to present each kind.

use serde::{Deserialize, Serialize};

/// A message crossing the engine/display-surface boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Delivery {
    /// Full page content to render as markup text.
    Document {
        /// The fetched document body.
        markup: String,
    },
    /// Image loaded natively by the display surface via the reference URL.
    Image {
        /// Proxied reference URL.
        url: String,
    },
    /// Audio loaded natively by the display surface via the reference URL.
    Audio {
        /// Proxied reference URL.
        url: String,
    },
    /// Video loaded natively by the display surface via the reference URL.
    Video {
        /// Proxied reference URL.
        url: String,
    },
    /// Generic binary resource as a self-contained inline encoding.
    Resource {
        /// `data:` URL carrying the base64-encoded payload.
        data_url: String,
    },
    /// Navigation instruction; bypasses fetching entirely.
    Href {
        /// Absolute URL or same-document `#fragment`.
        url: String,
    },
    /// A failed or aborted attempt, delivered so the display surface can
    /// render a diagnostic in place of content.
    Error {
        /// Upstream HTTP status, absent for transport-level failures.
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        /// Human-readable failure description.
        message: String,
    },
}

impl Delivery {
    /// Returns the stable `kind` tag for this message.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Document { .. } => "document",
            Self::Image { .. } => "image",
            Self::Audio { .. } => "audio",
            Self::Video { .. } => "video",
            Self::Resource { .. } => "resource",
            Self::Href { .. } => "href",
            Self::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_serializes_with_kind_tag() {
        let msg = Delivery::Href {
            url: "#section".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["kind"], "href");
        assert_eq!(json["url"], "#section");
    }

    #[test]
    fn test_error_omits_absent_status() {
        let msg = Delivery::Error {
            status: None,
            message: "network error".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("status").is_none());

        let msg = Delivery::Error {
            status: Some(404),
            message: "Not Found".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["status"], 404);
    }

    #[test]
    fn test_delivery_round_trips() {
        let msg = Delivery::Resource {
            data_url: "data:application/octet-stream;base64,AAEC".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: Delivery = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
        assert_eq!(msg.kind(), "resource");
    }

    #[test]
    fn test_kind_tags_are_stable() {
        let doc = Delivery::Document {
            markup: String::new(),
        };
        assert_eq!(doc.kind(), "document");
        let img = Delivery::Image {
            url: String::new(),
        };
        assert_eq!(img.kind(), "image");
    }
}
