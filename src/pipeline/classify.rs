//! Error classification: every failure becomes one display string.
//!
//! The presentation layer never inspects [`BlogGenError`] variants. It shows
//! whatever [`classify`] returns, in a toast and (for the video form) next to
//! the URL field, so both places always agree.

use crate::blog::SourceKind;
use crate::error::BlogGenError;

/// Message used when a failure carries nothing more specific.
pub const GENERIC_FAILURE: &str = "Failed to generate blog";

/// Map a failure to the message shown to the user.
///
/// Precedence:
/// 1. a server `detail`, verbatim;
/// 2. any other message the failure carries (transport reason, validation
///    prompt, normalisation reason);
/// 3. [`GENERIC_FAILURE`].
///
/// Both forms share this entry point; the fallback text is currently the
/// same for topic and video requests, so the kind is not consulted.
pub fn classify(err: &BlogGenError, _kind: SourceKind) -> String {
    let message = match err {
        BlogGenError::Server { detail, .. } => detail.clone(),
        BlogGenError::Transport { reason } => Some(reason.clone()),
        BlogGenError::Validation(v) => Some(v.user_message().to_string()),
        BlogGenError::Normalization { reason } => Some(capitalise(reason)),
        other => Some(other.to_string()),
    };

    message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn server_detail_is_verbatim() {
        let e = BlogGenError::Server {
            status: 500,
            detail: Some("quota exceeded".into()),
        };
        assert_eq!(classify(&e, SourceKind::Video), "quota exceeded");
    }

    #[test]
    fn server_without_detail_falls_back() {
        let e = BlogGenError::Server {
            status: 502,
            detail: None,
        };
        assert_eq!(classify(&e, SourceKind::Topic), GENERIC_FAILURE);
    }

    #[test]
    fn blank_detail_falls_back() {
        let e = BlogGenError::Server {
            status: 500,
            detail: Some("   ".into()),
        };
        assert_eq!(classify(&e, SourceKind::Topic), GENERIC_FAILURE);
    }

    #[test]
    fn transport_reason_surfaces() {
        let e = BlogGenError::Transport {
            reason: "Network Error".into(),
        };
        assert_eq!(classify(&e, SourceKind::Topic), "Network Error");
    }

    #[test]
    fn validation_uses_form_prompts() {
        let e: BlogGenError = ValidationError::EmptyTopic.into();
        assert_eq!(classify(&e, SourceKind::Topic), "Please enter a topic");
        let e: BlogGenError = ValidationError::InvalidUrl.into();
        assert_eq!(classify(&e, SourceKind::Video), "Please enter a valid YouTube URL");
    }

    #[test]
    fn normalisation_reads_as_sentence() {
        let e = BlogGenError::invalid_format();
        assert_eq!(classify(&e, SourceKind::Topic), "Invalid response format");
    }

    #[test]
    fn same_message_for_both_kinds() {
        let e = BlogGenError::Transport {
            reason: "timed out".into(),
        };
        assert_eq!(
            classify(&e, SourceKind::Topic),
            classify(&e, SourceKind::Video)
        );
    }
}
