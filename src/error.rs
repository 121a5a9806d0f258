//! Error types for the bloggen library.
//!
//! Two error types reflect two different moments of failure:
//!
//! * [`ValidationError`]: the user's input was rejected by the request
//!   builder. Nothing was sent; the form can be corrected and resubmitted.
//!
//! * [`BlogGenError`]: everything else: the service was unreachable, it
//!   answered with a non-2xx status, or it answered 2xx with a payload that
//!   holds no blog. Validation failures are wrapped here too so a single
//!   `Result` type flows through the orchestrator.
//!
//! Neither type reaches the presentation layer directly: the classifier in
//! [`crate::pipeline::classify`] turns every variant into one display string.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the bloggen library.
#[derive(Debug, Error)]
pub enum BlogGenError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The request builder rejected the input before anything was sent.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    // ── Network errors ────────────────────────────────────────────────────
    /// The service could not be reached or did not answer in time.
    ///
    /// `reason` is already human readable and is surfaced as-is.
    #[error("{reason}")]
    Transport { reason: String },

    /// The service answered with a non-2xx status.
    ///
    /// `detail` is the service's own explanation, when the body carried one.
    #[error("Server returned HTTP {status}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Server { status: u16, detail: Option<String> },

    /// The service answered 2xx but the body holds no usable blog.
    #[error("Invalid response format: {reason}")]
    Normalization { reason: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an exported Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BlogGenError {
    /// Shorthand for the envelope-level normalisation failure.
    pub(crate) fn invalid_format() -> Self {
        BlogGenError::Normalization {
            reason: "invalid response format".to_string(),
        }
    }
}

/// Input rejected by the request builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Topic text was empty after trimming.
    #[error("empty topic")]
    EmptyTopic,

    /// Video URL was empty after trimming.
    #[error("empty url")]
    EmptyUrl,

    /// Video URL did not match an accepted YouTube form.
    #[error("invalid url")]
    InvalidUrl,
}

impl ValidationError {
    /// Prompt shown next to the form field.
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::EmptyTopic => "Please enter a topic",
            ValidationError::EmptyUrl => "Please enter a YouTube URL",
            ValidationError::InvalidUrl => "Please enter a valid YouTube URL",
        }
    }
}
