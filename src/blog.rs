//! The canonical blog record and the small vocabulary types around it.
//!
//! [`Blog`] is what every successful generation turns into, regardless of
//! the envelope the service wrapped it in. It is deliberately plain data:
//! rendering lives in [`crate::pipeline::transform`], persistence in
//! [`crate::export`].

use crate::error::BlogGenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Title used when the service sends none (or an empty one).
pub const UNTITLED: &str = "Untitled";

/// Number of content characters carried by [`Blog::share_text`].
pub const SHARE_EXCERPT_CHARS: usize = 200;

const THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";

// ── LanguageCode ─────────────────────────────────────────────────────────

/// Target language of the generated post.
///
/// The wire form is the lowercase English name (`"hindi"`), which is also
/// what [`fmt::Display`] prints. [`LanguageCode::label`] gives the
/// capitalised form shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    #[default]
    English,
    Hindi,
    French,
    Telugu,
    Tamil,
    Malayalam,
    Japanese,
    Chinese,
}

impl LanguageCode {
    /// Every supported language, in menu order.
    pub const ALL: [LanguageCode; 8] = [
        LanguageCode::English,
        LanguageCode::Hindi,
        LanguageCode::French,
        LanguageCode::Telugu,
        LanguageCode::Tamil,
        LanguageCode::Malayalam,
        LanguageCode::Japanese,
        LanguageCode::Chinese,
    ];

    /// Wire value sent in the request body.
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::English => "english",
            LanguageCode::Hindi => "hindi",
            LanguageCode::French => "french",
            LanguageCode::Telugu => "telugu",
            LanguageCode::Tamil => "tamil",
            LanguageCode::Malayalam => "malayalam",
            LanguageCode::Japanese => "japanese",
            LanguageCode::Chinese => "chinese",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            LanguageCode::English => "English",
            LanguageCode::Hindi => "Hindi",
            LanguageCode::French => "French",
            LanguageCode::Telugu => "Telugu",
            LanguageCode::Tamil => "Tamil",
            LanguageCode::Malayalam => "Malayalam",
            LanguageCode::Japanese => "Japanese",
            LanguageCode::Chinese => "Chinese",
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageCode {
    type Err = BlogGenError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LanguageCode::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                BlogGenError::InvalidConfig(format!(
                    "Unknown language '{wanted}'. Expected one of: {}",
                    LanguageCode::ALL.map(|l| l.as_str()).join(", ")
                ))
            })
    }
}

// ── SourceKind ───────────────────────────────────────────────────────────

/// What a generation request is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Free-text topic.
    Topic,
    /// A YouTube video, by URL.
    Video,
}

impl SourceKind {
    /// Endpoint path on the generation service.
    pub fn endpoint(&self) -> &'static str {
        match self {
            SourceKind::Topic => "/blogs/topic",
            SourceKind::Video => "/blogs/youtube",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Topic => f.write_str("topic"),
            SourceKind::Video => f.write_str("youtube"),
        }
    }
}

// ── Blog ─────────────────────────────────────────────────────────────────

/// A generated blog post in canonical form.
///
/// Produced only by [`crate::pipeline::normalize::normalize`]; `title` is
/// never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub title: String,
    /// Markdown body. May be empty.
    pub content: String,
    pub language: LanguageCode,
    /// YouTube video identifier; only ever set for video-sourced posts.
    pub video_id: Option<String>,
}

impl Blog {
    /// The whole post as one Markdown document: `# <title>` then the body.
    pub fn to_markdown(&self) -> String {
        format!("# {}\n\n{}", self.title, self.content)
    }

    /// File name for a downloaded copy.
    ///
    /// Every character outside `[A-Za-z0-9]` becomes `_`, the result is
    /// lowercased, and `.md` is appended.
    pub fn download_filename(&self) -> String {
        let stem: String = self
            .title
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{stem}.md")
    }

    /// Short excerpt for share sheets: the first
    /// [`SHARE_EXCERPT_CHARS`] characters of the body.
    pub fn share_text(&self) -> String {
        self.content.chars().take(SHARE_EXCERPT_CHARS).collect()
    }

    /// Highest-resolution thumbnail for a video-sourced post.
    pub fn thumbnail_url(&self) -> Option<String> {
        self.video_id
            .as_deref()
            .map(|id| format!("{THUMBNAIL_BASE}/{id}/maxresdefault.jpg"))
    }

    /// Thumbnail to load when [`Blog::thumbnail_url`] fails; not every video
    /// has a max-resolution still.
    pub fn fallback_thumbnail_url(&self) -> Option<String> {
        self.video_id
            .as_deref()
            .map(|id| format!("{THUMBNAIL_BASE}/{id}/hqdefault.jpg"))
    }

    /// Link back to the source video.
    pub fn watch_url(&self) -> Option<String> {
        self.video_id
            .as_deref()
            .map(|id| format!("https://www.youtube.com/watch?v={id}"))
    }
}
