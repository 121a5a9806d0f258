//! # bloggen
//!
//! Client for an AI blog generation service: turn a topic or a YouTube URL
//! into a Markdown blog post, then into renderable blocks.
//!
//! ## Why this crate?
//!
//! The service answers with a loosely versioned JSON envelope, and the post
//! it returns is Markdown that a UI still has to split into text, code,
//! tables and images. This crate owns everything between the input box and
//! the screen: validation, one HTTP call, envelope normalisation, a single
//! user-facing error string, and the Markdown → block transform. Each step is
//! a pure function except the network call, so all of it is unit-testable.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input
//!  │
//!  ├─ 1. Request    validate topic / YouTube URL  (pipeline::request)
//!  ├─ 2. Service    POST /blogs/{topic,youtube}   (client, async)
//!  ├─ 3. Normalise  envelope → Blog               (pipeline::normalize)
//!  │     └─ on any failure → one message          (pipeline::classify)
//!  └─ 4. Transform  Markdown → Vec<RenderNode>    (pipeline::transform)
//! ```
//!
//! [`GenerationForm`] strings these together as a small per-form state
//! machine (`Idle → InFlight → Succeeded | Failed`).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bloggen::{ClientConfig, GenerationForm, GenerationState, HttpBlogService, SourceKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = HttpBlogService::new(ClientConfig::from_env()?)?;
//!     let mut form = GenerationForm::new(SourceKind::Topic);
//!     form.set_input("The Future of AI");
//!     match form.submit(&service).await? {
//!         GenerationState::Succeeded(blog) => println!("{}", blog.to_markdown()),
//!         GenerationState::Failed(msg) => eprintln!("{msg}"),
//!         _ => {}
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `bloggen` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Library-only users can drop the CLI dependencies:
//! ```toml
//! bloggen-client = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod blog;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod pipeline;
pub mod progress;
pub mod toast;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use blog::{Blog, LanguageCode, SourceKind};
pub use client::{BlogService, HealthStatus, HttpBlogService};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{BlogGenError, ValidationError};
pub use export::{write_markdown, write_markdown_in};
pub use orchestrator::{GenerationForm, GenerationState, GenerationTicket, SubmitError};
pub use pipeline::classify::classify;
pub use pipeline::normalize::normalize;
pub use pipeline::request::{build, is_youtube_url, GenerationRequest};
pub use pipeline::transform::{transform, RenderNode};
pub use progress::{GenerationCallback, NoopGenerationCallback};
pub use toast::{Toast, ToastKind};
