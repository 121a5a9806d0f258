//! Transient user notifications.
//!
//! A [`Toast`] is a plain value with an explicit lifetime. The caller owns it
//! and asks [`Toast::is_expired_at`] with its own clock; nothing here spawns
//! a timer, so the pipeline and its tests never wait on wall time.

use crate::orchestrator::GenerationState;
use std::time::{Duration, Instant};

pub const SUCCESS_MESSAGE: &str = "Blog generated successfully!";

/// Shown when a failure arrives with no usable text.
pub const ERROR_FALLBACK: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
    pub ttl: Duration,
}

impl Toast {
    pub fn success(shown_at: Instant, ttl: Duration) -> Self {
        Self {
            message: SUCCESS_MESSAGE.to_string(),
            kind: ToastKind::Success,
            shown_at,
            ttl,
        }
    }

    /// Error toast. A blank `message` is replaced with [`ERROR_FALLBACK`].
    pub fn error(message: &str, shown_at: Instant, ttl: Duration) -> Self {
        let message = match message.trim() {
            "" => ERROR_FALLBACK.to_string(),
            m => m.to_string(),
        };
        Self {
            message,
            kind: ToastKind::Error,
            shown_at,
            ttl,
        }
    }

    /// The toast announcing a settled state, if any. `Idle` and `InFlight`
    /// announce nothing.
    pub fn for_state(state: &GenerationState, shown_at: Instant, ttl: Duration) -> Option<Self> {
        match state {
            GenerationState::Succeeded(_) => Some(Self::success(shown_at, ttl)),
            GenerationState::Failed(msg) => Some(Self::error(msg, shown_at, ttl)),
            GenerationState::Idle | GenerationState::InFlight => None,
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.ttl
            .saturating_sub(now.saturating_duration_since(self.shown_at))
    }
}
