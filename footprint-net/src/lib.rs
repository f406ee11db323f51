//! Footprint Network Layer
//!
//! Per-platform network operations:
//! - HTTP transport behind the [`Fetcher`] capability
//! - Existence probing with a fixed per-request deadline
//! - Visible-text extraction from public profile pages

pub mod client;
pub mod extractor;
pub mod prober;

pub use client::*;
pub use extractor::*;
pub use prober::*;
