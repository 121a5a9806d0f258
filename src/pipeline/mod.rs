//! Pipeline stages for blog generation.
//!
//! Each submodule implements exactly one step and is a pure function of its
//! input, so every stage is testable without a network. The only I/O lives
//! in [`crate::client`], between `request` and `normalize`.
//!
//! ## Data Flow
//!
//! ```text
//! request ──▶ (network) ──▶ normalize ──▶ transform
//!                  │
//!                  └──────▶ classify   (on any failure)
//! ```
//!
//! 1. [`request`]  : validate form input into a [`request::GenerationRequest`]
//! 2. [`normalize`]: unwrap the service envelope into a canonical blog
//! 3. [`classify`] : collapse any failure into one user-facing message
//! 4. [`transform`]: parse the blog's Markdown into render nodes

pub mod classify;
pub mod normalize;
pub mod request;
pub mod transform;
