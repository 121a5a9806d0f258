//! Request building: turn raw form input into a validated request.
//!
//! Nothing here touches the network. A [`GenerationRequest`] only exists once
//! its input has passed validation, so the transport never has to re-check.
//!
//! The video form validates on every keystroke for live feedback and again
//! before dispatch. Both paths go through [`is_youtube_url`] so the two checks
//! cannot drift apart.

use crate::blog::{LanguageCode, SourceKind};
use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// A validated generation request, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    /// Generate from free text. `topic` is trimmed and non-empty.
    Topic { topic: String, language: LanguageCode },
    /// Generate from a YouTube video. `video_url` passed [`is_youtube_url`].
    Video {
        video_url: String,
        language: LanguageCode,
    },
}

impl GenerationRequest {
    pub fn kind(&self) -> SourceKind {
        match self {
            GenerationRequest::Topic { .. } => SourceKind::Topic,
            GenerationRequest::Video { .. } => SourceKind::Video,
        }
    }

    pub fn language(&self) -> LanguageCode {
        match self {
            GenerationRequest::Topic { language, .. }
            | GenerationRequest::Video { language, .. } => *language,
        }
    }

    /// The user-supplied part of the request (topic text or URL).
    pub fn input(&self) -> &str {
        match self {
            GenerationRequest::Topic { topic, .. } => topic,
            GenerationRequest::Video { video_url, .. } => video_url,
        }
    }

    /// JSON body for the service endpoint.
    pub fn body(&self) -> RequestBody<'_> {
        match self {
            GenerationRequest::Topic { topic, language } => RequestBody::Topic {
                topic,
                language: language.as_str(),
            },
            GenerationRequest::Video {
                video_url,
                language,
            } => RequestBody::Video {
                youtube_url: video_url,
                language: language.as_str(),
            },
        }
    }
}

/// Wire shape of a request body.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RequestBody<'a> {
    Topic { topic: &'a str, language: &'a str },
    Video {
        youtube_url: &'a str,
        language: &'a str,
    },
}

static RE_YOUTUBE_WATCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https://(?:www\.)?youtube\.com/watch\?v=[A-Za-z0-9_-]+$").unwrap());

static RE_YOUTUBE_SHORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https://youtu\.be/[A-Za-z0-9_-]+$").unwrap());

/// Whether `url` is one of the two accepted YouTube forms:
/// `https://[www.]youtube.com/watch?v=<id>` or `https://youtu.be/<id>`,
/// where `<id>` is one or more ASCII letters, digits, `_` or `-`.
pub fn is_youtube_url(url: &str) -> bool {
    RE_YOUTUBE_WATCH.is_match(url) || RE_YOUTUBE_SHORT.is_match(url)
}

/// Build a request of the given kind from raw form input.
///
/// # Errors
/// * Topic: [`ValidationError::EmptyTopic`] when the trimmed input is empty.
/// * Video: [`ValidationError::EmptyUrl`] when the trimmed input is empty,
///   [`ValidationError::InvalidUrl`] when it is not an accepted YouTube URL.
pub fn build(
    kind: SourceKind,
    raw_input: &str,
    language: LanguageCode,
) -> Result<GenerationRequest, ValidationError> {
    let input = raw_input.trim();
    match kind {
        SourceKind::Topic => {
            if input.is_empty() {
                return Err(ValidationError::EmptyTopic);
            }
            Ok(GenerationRequest::Topic {
                topic: input.to_string(),
                language,
            })
        }
        SourceKind::Video => {
            if input.is_empty() {
                return Err(ValidationError::EmptyUrl);
            }
            if !is_youtube_url(input) {
                return Err(ValidationError::InvalidUrl);
            }
            Ok(GenerationRequest::Video {
                video_url: input.to_string(),
                language,
            })
        }
    }
}

/// Live feedback for a URL field as the user types.
///
/// Empty input is not an error yet; anything else must pass
/// [`is_youtube_url`].
pub fn url_feedback(raw_input: &str) -> Option<ValidationError> {
    let input = raw_input.trim();
    if !input.is_empty() && !is_youtube_url(input) {
        Some(ValidationError::InvalidUrl)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID_CHARS: &[&str] = &["a", "Z", "0", "_", "-", "abc123", "dQw4w9WgXcQ", "x-y_z"];

    #[test]
    fn topic_is_trimmed() {
        let req = build(SourceKind::Topic, "  The Future of AI \n", LanguageCode::English).unwrap();
        assert_eq!(req.input(), "The Future of AI");
        assert_eq!(req.kind(), SourceKind::Topic);
    }

    #[test]
    fn blank_topics_rejected() {
        for input in ["", " ", "\t\n", "   \r\n  "] {
            assert_eq!(
                build(SourceKind::Topic, input, LanguageCode::English),
                Err(ValidationError::EmptyTopic),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn non_blank_topics_accepted() {
        for input in ["a", " x ", "The Future of AI", "日本語のブログ", "#1 tips"] {
            assert!(build(SourceKind::Topic, input, LanguageCode::Japanese).is_ok());
        }
    }

    #[test]
    fn generated_valid_urls_accepted() {
        let prefixes = [
            "https://youtube.com/watch?v=",
            "https://www.youtube.com/watch?v=",
            "https://youtu.be/",
        ];
        for prefix in prefixes {
            for id in ID_CHARS {
                let url = format!("{prefix}{id}");
                assert!(is_youtube_url(&url), "should accept {url}");
                assert!(build(SourceKind::Video, &url, LanguageCode::Hindi).is_ok());
            }
        }
    }

    #[test]
    fn generated_invalid_urls_rejected() {
        let bad_prefixes = [
            "http://youtu.be/",
            "https://m.youtube.com/watch?v=",
            "https://youtube.com/embed/",
            "https://youtu.be.evil.com/",
            "https://vimeo.com/",
            "youtu.be/",
            "",
        ];
        let bad_ids = [
            "", "a b", "a/b", "a?t=1", "a&list=x", "%20", "日本語", "é", "abc\u{0663}",
        ];
        for prefix in bad_prefixes {
            for id in bad_ids {
                let url = format!("{prefix}{id}");
                assert!(!is_youtube_url(&url), "should reject {url:?}");
            }
        }
        for id in bad_ids {
            assert!(!is_youtube_url(&format!("https://youtu.be/{id}")));
            assert!(!is_youtube_url(&format!("https://www.youtube.com/watch?v={id}")));
        }
        assert!(!is_youtube_url("not a url"));
    }

    #[test]
    fn non_ascii_ids_rejected() {
        for url in [
            "https://youtu.be/日本語",
            "https://www.youtube.com/watch?v=é",
            "https://youtu.be/abc\u{0663}",
            "https://youtube.com/watch?v=dQw4w9WgXcQ\u{00e9}",
        ] {
            assert!(!is_youtube_url(url), "should reject {url:?}");
            assert_eq!(
                build(SourceKind::Video, url, LanguageCode::English),
                Err(ValidationError::InvalidUrl)
            );
        }
    }

    #[test]
    fn video_errors_distinguish_empty_from_invalid() {
        assert_eq!(
            build(SourceKind::Video, "  ", LanguageCode::English),
            Err(ValidationError::EmptyUrl)
        );
        assert_eq!(
            build(SourceKind::Video, "https://example.com", LanguageCode::English),
            Err(ValidationError::InvalidUrl)
        );
    }

    #[test]
    fn url_feedback_ignores_empty_field() {
        assert_eq!(url_feedback(""), None);
        assert_eq!(url_feedback("https://youtu.be/abc"), None);
        assert_eq!(url_feedback("https://youtu"), Some(ValidationError::InvalidUrl));
    }

    #[test]
    fn bodies_use_service_field_names() {
        let topic = build(SourceKind::Topic, "Rust", LanguageCode::French).unwrap();
        assert_eq!(
            serde_json::to_value(topic.body()).unwrap(),
            serde_json::json!({ "topic": "Rust", "language": "french" })
        );

        let video = build(SourceKind::Video, "https://youtu.be/abc123", LanguageCode::Tamil).unwrap();
        assert_eq!(
            serde_json::to_value(video.body()).unwrap(),
            serde_json::json!({ "youtube_url": "https://youtu.be/abc123", "language": "tamil" })
        );
    }
}
