//! Callback trait for generation lifecycle events.
//!
//! Attach an [`Arc<dyn GenerationCallback>`] to a
//! [`GenerationForm`](crate::orchestrator::GenerationForm) with
//! [`with_callback`](crate::orchestrator::GenerationForm::with_callback) to
//! hear about each dispatch as it happens. The CLI drives its spinner this
//! way; a GUI host would repaint its loading state.
//!
//! # Example
//!
//! ```rust
//! use bloggen::{Blog, GenerationCallback, GenerationForm, SourceKind};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct Counter(AtomicUsize);
//!
//! impl GenerationCallback for Counter {
//!     fn on_generation_complete(&self, _kind: SourceKind, _blog: &Blog, _elapsed_ms: u64) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let form = GenerationForm::new(SourceKind::Topic)
//!     .with_callback(Arc::new(Counter(AtomicUsize::new(0))));
//! ```

use crate::blog::{Blog, SourceKind};
use std::sync::Arc;

/// Called by a form as a generation moves through its states.
///
/// All methods default to no-ops so implementors only override what they
/// use. Forms may live on different tasks, hence `Send + Sync`.
pub trait GenerationCallback: Send + Sync {
    /// A validated request is about to be sent.
    ///
    /// # Arguments
    /// * `kind` : which form dispatched
    /// * `input`: the trimmed topic or URL
    fn on_generation_start(&self, kind: SourceKind, input: &str) {
        let _ = (kind, input);
    }

    /// The response normalised into a blog.
    fn on_generation_complete(&self, kind: SourceKind, blog: &Blog, elapsed_ms: u64) {
        let _ = (kind, blog, elapsed_ms);
    }

    /// Validation, transport, server or normalisation failure.
    ///
    /// `message` is the classified text, the same string the form stores in
    /// its `Failed` state.
    fn on_generation_error(&self, kind: SourceKind, message: &str) {
        let _ = (kind, message);
    }
}

/// Used when no callback is attached.
pub struct NoopGenerationCallback;

impl GenerationCallback for NoopGenerationCallback {}

/// Shared handle stored on a form.
pub type SharedCallback = Arc<dyn GenerationCallback>;
