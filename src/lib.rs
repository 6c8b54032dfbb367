//! Quill: markup-driven rich-text layout and typing engine.
//!
//! This facade re-exports the member crates so hosts can depend on a single
//! package:
//! - [`quill_text`] — fonts, markup parsing, line layout, reveal animation.
//! - [`quill_config`] — `quill.toml` configuration loading.

pub use quill_config as config;
pub use quill_text as text;

pub use quill_text::{
    Align, FontArena, FontId, Label, Layout, MarkupOptions, RevealState, Rgba, StyleState,
};

/// Simple helper to allow smoke tests to link against this crate.
pub fn is_available() -> bool {
    true
}
