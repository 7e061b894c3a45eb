//! Negotiation state machine: assumed vs. declared category reconciliation.
//!
//! One resolution owns one [`NegotiationAttempt`]. Each network round trip
//! yields a [`Decision`] from the pure transition table in [`decide`]; the
//! attempt then applies the decision, enforcing the structural termination
//! bound: each retransition target (`document`, then `binary-resource`) is
//! entered at most once, so no input causes more than 2 retransitions. A
//! retransition whose target was already visited accepts in place instead
//! of looping, which keeps misbehaving servers from driving unbounded
//! refetches.

use url::Url;

use crate::classify::{ContentCategory, MediaCategory};

/// Content category declared by the server, from the `content-type`
/// header's primary type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredCategory {
    /// `text/*` - renderable as a document.
    Text,
    /// `image/*` - directly renderable by reference.
    Image,
    /// `audio/*` - directly renderable by reference.
    Audio,
    /// `video/*` - directly renderable by reference.
    Video,
    /// Any other or unparseable primary type.
    Other,
}

impl DeclaredCategory {
    /// Parses a raw `content-type` header value.
    ///
    /// The primary type is the leading run of word characters, compared
    /// case-insensitively; anything unrecognized is [`Self::Other`].
    #[must_use]
    pub fn from_content_type(header: &str) -> Self {
        let primary: String = header
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match primary.as_str() {
            "text" => Self::Text,
            "image" => Self::Image,
            "audio" => Self::Audio,
            "video" => Self::Video,
            _ => Self::Other,
        }
    }

    /// The media category this declaration short-circuits to, if any.
    #[must_use]
    pub fn media_category(self) -> Option<MediaCategory> {
        match self {
            Self::Image => Some(MediaCategory::Image),
            Self::Audio => Some(MediaCategory::Audio),
            Self::Video => Some(MediaCategory::Video),
            Self::Text | Self::Other => None,
        }
    }
}

/// Outcome of comparing one response against the assumed category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Declared type is absent or matches; handle the payload as assumed.
    Accept,
    /// Declared media type is renderable by reference; terminal regardless
    /// of the assumed category, body discarded.
    ShortCircuit(MediaCategory),
    /// Discard this response and refetch under a new assumed category.
    Retransition(ContentCategory),
}

/// Transition table over (assumed category, declared content-type).
///
/// The rules, in order:
/// 1. Absent header, or declared primary matching the assumed category,
///    accepts.
/// 2. Declared `text` with a non-document assumption retransitions to
///    `document`.
/// 3. Declared `image`/`audio`/`video` short-circuits to that category.
/// 4. Anything else retransitions to `binary-resource`, unless already
///    there, which accepts as generic binary.
#[must_use]
pub fn decide(assumed: ContentCategory, content_type: Option<&str>) -> Decision {
    let Some(header) = content_type else {
        return Decision::Accept;
    };
    let declared = DeclaredCategory::from_content_type(header);
    match (assumed, declared) {
        (ContentCategory::Document, DeclaredCategory::Text)
        | (ContentCategory::Image, DeclaredCategory::Image)
        | (ContentCategory::Audio, DeclaredCategory::Audio)
        | (ContentCategory::Video, DeclaredCategory::Video)
        | (ContentCategory::Binary, DeclaredCategory::Other) => Decision::Accept,
        (_, DeclaredCategory::Text) => Decision::Retransition(ContentCategory::Document),
        (_, DeclaredCategory::Image) => Decision::ShortCircuit(MediaCategory::Image),
        (_, DeclaredCategory::Audio) => Decision::ShortCircuit(MediaCategory::Audio),
        (_, DeclaredCategory::Video) => Decision::ShortCircuit(MediaCategory::Video),
        (_, DeclaredCategory::Other) => Decision::Retransition(ContentCategory::Binary),
    }
}

/// Next step for the fetch loop after applying a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Terminal: handle the current response's payload as this category.
    Accept(ContentCategory),
    /// Terminal: deliver this media category by reference URL.
    ShortCircuit(MediaCategory),
    /// Issue a new request under the updated assumed category.
    Refetch,
}

/// Request-scoped negotiation state.
///
/// Created when resolution begins, mutated only through
/// [`NegotiationAttempt::apply`], dropped when a terminal step is reached.
/// Never shared across concurrent resolutions.
#[derive(Debug)]
pub struct NegotiationAttempt {
    target: Url,
    assumed: ContentCategory,
    attempt_count: u8,
    visited_document: bool,
    visited_binary: bool,
}

impl NegotiationAttempt {
    /// Starts an attempt at the classifier's guess or the caller-declared
    /// category.
    #[must_use]
    pub fn new(target: Url, assumed: ContentCategory) -> Self {
        Self {
            target,
            assumed,
            attempt_count: 0,
            visited_document: assumed == ContentCategory::Document,
            visited_binary: assumed == ContentCategory::Binary,
        }
    }

    /// The original (pre-proxy) target URL.
    #[must_use]
    pub fn target(&self) -> &Url {
        &self.target
    }

    /// The currently assumed category.
    #[must_use]
    pub fn assumed(&self) -> ContentCategory {
        self.assumed
    }

    /// Number of retransitions taken so far. Never exceeds 2.
    #[must_use]
    pub fn attempt_count(&self) -> u8 {
        self.attempt_count
    }

    fn visited(&self, category: ContentCategory) -> bool {
        match category {
            ContentCategory::Document => self.visited_document,
            ContentCategory::Binary => self.visited_binary,
            // Media categories are never retransition targets.
            _ => true,
        }
    }

    /// Applies a decision, returning the next step for the fetch loop.
    ///
    /// A retransition into an already-visited category terminates as an
    /// accept of the current assumption instead of refetching.
    pub fn apply(&mut self, decision: Decision) -> Step {
        match decision {
            Decision::Accept => Step::Accept(self.assumed),
            Decision::ShortCircuit(category) => Step::ShortCircuit(category),
            Decision::Retransition(next) => {
                if self.visited(next) {
                    return Step::Accept(self.assumed);
                }
                match next {
                    ContentCategory::Document => self.visited_document = true,
                    ContentCategory::Binary => self.visited_binary = true,
                    _ => {}
                }
                self.attempt_count += 1;
                self.assumed = next;
                Step::Refetch
            }
        }
    }
}
