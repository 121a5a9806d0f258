//! Response normalisation: any known envelope → canonical [`Blog`].
//!
//! The generation service has shipped several payload shapes over time and
//! does not version its envelope. Rather than probing fields ad hoc, the
//! normaliser walks a fixed fallback chain:
//!
//! ```text
//! raw ──▶ data = raw.data ?? raw ──▶ blog = data.blog ?? data
//!                                        │
//!                      title / content: Text │ Nested{content} │ Missing
//! ```
//!
//! Every field resolves to one of three [`FieldShape`]s, so an unexpected
//! shape degrades to a default instead of failing the whole response. Only
//! an envelope with no blog in it at all is an error.

use crate::blog::{Blog, LanguageCode, SourceKind, UNTITLED};
use crate::error::BlogGenError;
use serde_json::Value;
use tracing::debug;

/// Keys that may carry the YouTube video id, in lookup order.
const VIDEO_ID_KEYS: [&str; 2] = ["videoId", "video_id"];

/// How a `title` or `content` field was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape<'a> {
    /// `"title": "…"`
    Text(&'a str),
    /// `"title": { "content": "…" }`
    Nested(&'a str),
    /// Absent, null, or some other type.
    Missing,
}

impl<'a> FieldShape<'a> {
    /// Classify `payload[key]`.
    pub fn of(payload: &'a Value, key: &str) -> Self {
        match payload.get(key) {
            Some(Value::String(s)) => FieldShape::Text(s.as_str()),
            Some(Value::Object(obj)) => match obj.get("content") {
                Some(Value::String(s)) => FieldShape::Nested(s.as_str()),
                _ => FieldShape::Missing,
            },
            _ => FieldShape::Missing,
        }
    }

    /// The resolved string, or `default` when missing or empty.
    pub fn resolve(self, default: &str) -> String {
        match self {
            FieldShape::Text(s) | FieldShape::Nested(s) if !s.is_empty() => s.to_string(),
            _ => default.to_string(),
        }
    }
}

/// `value[key]`, treating JSON `null` as absent.
fn present<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

/// Unwrap the two optional envelope levels. Returns `(data, blog)`.
fn unwrap_envelope(raw: &Value) -> (&Value, &Value) {
    let data = present(raw, "data").unwrap_or(raw);
    let blog = present(data, "blog").unwrap_or(data);
    (data, blog)
}

/// A blog payload must be an object. A bare `{}` response carries none;
/// an empty or unrecognised object under `blog`/`data` still degrades to the
/// field defaults.
fn is_blog_payload(raw: &Value, blog: &Value) -> bool {
    let empty_response = raw.as_object().is_some_and(|obj| obj.is_empty());
    blog.is_object() && !empty_response
}

/// First non-empty string under any of [`VIDEO_ID_KEYS`].
fn video_id_in(value: &Value) -> Option<String> {
    VIDEO_ID_KEYS
        .iter()
        .find_map(|key| {
            value
                .get(*key)
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
        })
        .map(String::from)
}

/// Normalise a raw service response into a [`Blog`].
///
/// The video id is looked up on the root first, then inside `data`, and only
/// for [`SourceKind::Video`]; topic posts never carry one.
///
/// # Errors
/// [`BlogGenError::Normalization`] when no blog payload can be found.
pub fn normalize(raw: &Value, language: LanguageCode, kind: SourceKind) -> Result<Blog, BlogGenError> {
    let (data, blog) = unwrap_envelope(raw);

    if !is_blog_payload(raw, blog) {
        debug!("No blog payload in response: {}", raw);
        return Err(BlogGenError::invalid_format());
    }

    let title_shape = FieldShape::of(blog, "title");
    let content_shape = FieldShape::of(blog, "content");
    debug!("Response shapes: title={:?}, content={:?}", title_shape, content_shape);

    let video_id = match kind {
        SourceKind::Topic => None,
        SourceKind::Video => video_id_in(raw).or_else(|| video_id_in(data)),
    };

    Ok(Blog {
        title: title_shape.resolve(UNTITLED),
        content: content_shape.resolve(""),
        language,
        video_id,
    })
}
