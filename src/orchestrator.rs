//! Per-form generation state machine.
//!
//! One [`GenerationForm`] backs each input form (topic or video). Forms share
//! nothing, so both can have a request in flight at the same time.
//!
//! ```text
//!            begin (valid)              resolve(Ok, normalised)
//!   Idle ───────────────────▶ InFlight ─────────────────────────▶ Succeeded(blog)
//!    ▲                          │    │                                  │
//!    │          abandon         │    │ resolve(Err) / normalise error   │
//!    └──────────────────────────┘    ▼                                  │
//!                                 Failed(msg) ◀──── begin (invalid) ────┘
//! ```
//!
//! `Succeeded` and `Failed` both accept a new submission. A submission while
//! `InFlight` is rejected.
//!
//! ## Stale results
//!
//! Every dispatch gets a [`GenerationTicket`] carrying a sequence number that
//! increases per form. [`GenerationForm::resolve`] applies a result only when
//! its ticket is the outstanding one. After [`GenerationForm::abandon`] no
//! ticket is outstanding, so a late answer for the abandoned request is
//! dropped.
//!
//! The split between [`begin`](GenerationForm::begin) and
//! [`resolve`](GenerationForm::resolve) lets a host run the network call on
//! its own executor; [`submit`](GenerationForm::submit) does both in one
//! await for the common case.

use crate::blog::{Blog, LanguageCode, SourceKind};
use crate::client::BlogService;
use crate::error::{BlogGenError, ValidationError};
use crate::pipeline::classify::classify;
use crate::pipeline::normalize::normalize;
use crate::pipeline::request::{self, GenerationRequest};
use crate::progress::{NoopGenerationCallback, SharedCallback};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

// ── State ────────────────────────────────────────────────────────────────

/// Where a form is in its generation lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    InFlight,
    Succeeded(Blog),
    /// Classified, user-facing message.
    Failed(String),
}

impl GenerationState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, GenerationState::InFlight)
    }
}

/// Why [`GenerationForm::begin`] did not dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a generation is already in flight for this form")]
    AlreadyInFlight,

    /// The form moved to `Failed` with the validation prompt.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Proof of one dispatch. Hand it back to [`GenerationForm::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    seq: u64,
    request: GenerationRequest,
}

impl GenerationTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The validated request to send.
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

// ── Form ─────────────────────────────────────────────────────────────────

/// Input, language and generation state for one form.
pub struct GenerationForm {
    kind: SourceKind,
    input: String,
    language: LanguageCode,
    state: GenerationState,
    latest_blog: Option<Blog>,
    field_error: Option<String>,
    last_seq: u64,
    outstanding: Option<u64>,
    started_at: Option<Instant>,
    callback: SharedCallback,
}

impl std::fmt::Debug for GenerationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationForm")
            .field("kind", &self.kind)
            .field("input", &self.input)
            .field("language", &self.language)
            .field("state", &self.state)
            .field("field_error", &self.field_error)
            .field("last_seq", &self.last_seq)
            .field("outstanding", &self.outstanding)
            .finish_non_exhaustive()
    }
}

impl GenerationForm {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            input: String::new(),
            language: LanguageCode::default(),
            state: GenerationState::Idle,
            latest_blog: None,
            field_error: None,
            last_seq: 0,
            outstanding: None,
            started_at: None,
            callback: Arc::new(NoopGenerationCallback),
        }
    }

    /// Attach a lifecycle callback.
    pub fn with_callback(mut self, callback: SharedCallback) -> Self {
        self.callback = callback;
        self
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn language(&self) -> LanguageCode {
        self.language
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// The most recent successful blog. Survives later in-flight and failed
    /// submissions until the next success replaces it.
    pub fn latest_blog(&self) -> Option<&Blog> {
        self.latest_blog.as_ref()
    }

    /// Inline message for the input field. Only the video form sets one.
    pub fn field_error(&self) -> Option<&str> {
        self.field_error.as_deref()
    }

    /// Replace the input text. The video form re-validates immediately.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        if self.kind == SourceKind::Video {
            self.field_error = request::url_feedback(&self.input)
                .map(|e| e.user_message().to_string());
        }
    }

    pub fn set_language(&mut self, language: LanguageCode) {
        self.language = language;
    }

    /// Validate the current input and, if valid, move to `InFlight`.
    ///
    /// # Errors
    /// * [`SubmitError::AlreadyInFlight`]: state is untouched.
    /// * [`SubmitError::Invalid`]: the form is now `Failed` with the prompt.
    pub fn begin(&mut self) -> Result<GenerationTicket, SubmitError> {
        if self.state.is_in_flight() {
            debug!("{} form: submit rejected, request in flight", self.kind);
            return Err(SubmitError::AlreadyInFlight);
        }

        let request = match request::build(self.kind, &self.input, self.language) {
            Ok(r) => r,
            Err(e) => {
                let message = classify(&BlogGenError::from(e), self.kind);
                self.fail(message);
                return Err(SubmitError::Invalid(e));
            }
        };

        self.last_seq += 1;
        self.outstanding = Some(self.last_seq);
        self.started_at = Some(Instant::now());
        self.state = GenerationState::InFlight;
        self.callback.on_generation_start(self.kind, request.input());
        debug!("{} form: dispatch #{}", self.kind, self.last_seq);

        Ok(GenerationTicket {
            seq: self.last_seq,
            request,
        })
    }

    /// Apply the outcome of a dispatch.
    ///
    /// Returns `false` (and changes nothing) when `ticket` is not the
    /// outstanding one.
    pub fn resolve(
        &mut self,
        ticket: &GenerationTicket,
        outcome: Result<Value, BlogGenError>,
    ) -> bool {
        if self.outstanding != Some(ticket.seq) {
            warn!(
                "{} form: discarding stale result #{} (outstanding: {:?})",
                self.kind, ticket.seq, self.outstanding
            );
            return false;
        }
        self.outstanding = None;
        let elapsed_ms = self
            .started_at
            .take()
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);

        let language = ticket.request.language();
        match outcome.and_then(|raw| normalize(&raw, language, self.kind)) {
            Ok(blog) => {
                self.callback
                    .on_generation_complete(self.kind, &blog, elapsed_ms);
                self.input.clear();
                self.field_error = None;
                self.latest_blog = Some(blog.clone());
                self.state = GenerationState::Succeeded(blog);
            }
            Err(e) => {
                warn!("{} form: generation failed: {}", self.kind, e);
                let message = classify(&e, self.kind);
                self.fail(message);
            }
        }
        true
    }

    /// Validate, send through `service`, and apply the result.
    ///
    /// Validation failures are not an `Err` here: they land in
    /// [`GenerationState::Failed`] like any other failure.
    ///
    /// # Errors
    /// [`SubmitError::AlreadyInFlight`] if a split
    /// [`begin`](Self::begin)/[`resolve`](Self::resolve) is still pending.
    pub async fn submit(
        &mut self,
        service: &dyn BlogService,
    ) -> Result<&GenerationState, SubmitError> {
        let ticket = match self.begin() {
            Ok(t) => t,
            Err(SubmitError::Invalid(_)) => return Ok(&self.state),
            Err(e) => return Err(e),
        };
        let outcome = service.generate(ticket.request()).await;
        self.resolve(&ticket, outcome);
        Ok(&self.state)
    }

    /// Give up on the in-flight request and return to `Idle`.
    ///
    /// Returns whether there was anything to abandon.
    pub fn abandon(&mut self) -> bool {
        if !self.state.is_in_flight() {
            return false;
        }
        debug!(
            "{} form: abandoning dispatch #{:?}",
            self.kind, self.outstanding
        );
        self.outstanding = None;
        self.started_at = None;
        self.state = GenerationState::Idle;
        true
    }

    fn fail(&mut self, message: String) {
        if self.kind == SourceKind::Video {
            self.field_error = Some(message.clone());
        }
        self.callback.on_generation_error(self.kind, &message);
        self.state = GenerationState::Failed(message);
    }
}
