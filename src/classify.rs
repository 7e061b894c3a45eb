//! URL-shape heuristics for picking an initial content category.
//!
//! The classifier looks only at the final path segment of a URL (query and
//! fragment tolerated) and guesses which category of content lives behind
//! it. It is a heuristic, not a guarantee: the negotiation state machine in
//! [`crate::resolve`] is responsible for correcting a wrong guess once the
//! server has declared an actual content type.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Document-like URL shapes: markup/script-rendered extensions, a final
/// segment with no extension at all, or a final segment with no letters.
#[allow(clippy::expect_used)]
static DOCUMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\.(?:s?html?|php|cgi|txt|(?:j|a)spx?|json|py|pl|cfml?)|/(?:[^.]*|[^a-z?#]+))(?:[?#].*)?$")
        .expect("document pattern is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static IMAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(?:jpe?g|png|gif|bmp)(?:[?#].*)?$").expect("image pattern is valid")
});

#[allow(clippy::expect_used)]
static AUDIO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(?:mp3|wav)(?:[?#].*)?$").expect("audio pattern is valid")
});

#[allow(clippy::expect_used)]
static VIDEO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(?:mp4|webm|ogg)(?:[?#].*)?$").expect("video pattern is valid")
});

/// Content category assumed for, or declared by, a fetched resource.
///
/// Exactly one category is assumed at any point in a negotiation attempt.
/// The serialized labels are stable wire vocabulary shared with the display
/// surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    /// Renderable markup or plain text, delivered as a full body.
    Document,
    /// Raster image, delivered by reference URL.
    Image,
    /// Audio stream, delivered by reference URL.
    Audio,
    /// Video stream, delivered by reference URL.
    Video,
    /// Generic binary resource, delivered as inline-encoded bytes.
    #[serde(rename = "binary-resource")]
    Binary,
}

impl ContentCategory {
    /// Returns the stable string label for this category.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Binary => "binary-resource",
        }
    }

    /// Returns true for the categories the display surface loads natively
    /// by reference URL instead of by body.
    #[must_use]
    pub fn is_media(self) -> bool {
        self.as_media().is_some()
    }

    /// The by-reference refinement of this category, if it has one.
    #[must_use]
    pub fn as_media(self) -> Option<MediaCategory> {
        match self {
            Self::Image => Some(MediaCategory::Image),
            Self::Audio => Some(MediaCategory::Audio),
            Self::Video => Some(MediaCategory::Video),
            Self::Document | Self::Binary => None,
        }
    }
}

/// The subset of categories the display surface renders by reference URL.
///
/// Holding one of these proves the content is media; code paths that only
/// make sense for media take this instead of a full [`ContentCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    /// Raster image.
    Image,
    /// Audio stream.
    Audio,
    /// Video stream.
    Video,
}

impl MediaCategory {
    /// Returns the stable string label for this category.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guesses the initial content category for a URL with no caller-declared
/// type.
///
/// Patterns are checked in a fixed order: document shapes first, then image,
/// audio, and video extensions. Anything not matched is assumed to be a
/// generic binary resource.
///
/// # Examples
///
/// ```
/// use proxyview_core::classify::{ContentCategory, classify_url};
///
/// assert_eq!(classify_url("http://example.com/"), ContentCategory::Document);
/// assert_eq!(classify_url("http://example.com/a.png"), ContentCategory::Image);
/// assert_eq!(classify_url("http://example.com/a.zip"), ContentCategory::Binary);
/// ```
#[must_use]
pub fn classify_url(url: &str) -> ContentCategory {
    if DOCUMENT_PATTERN.is_match(url) {
        ContentCategory::Document
    } else if IMAGE_PATTERN.is_match(url) {
        ContentCategory::Image
    } else if AUDIO_PATTERN.is_match(url) {
        ContentCategory::Audio
    } else if VIDEO_PATTERN.is_match(url) {
        ContentCategory::Video
    } else {
        ContentCategory::Binary
    }
}
