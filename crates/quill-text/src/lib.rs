//! quill-text: markup-driven rich-text layout and typing engine.
//!
//! The pipeline, in order:
//! - `font`: glyph/font data model (atlas-backed bitmap and distance-field
//!   fonts, families, fallback resolution)
//! - `markup`: tokenizer and interpreter for the inline tag language,
//!   producing styled glyph sequences
//! - `layout`: word wrapping, truncation, alignment and glyph positioning
//! - `reveal`: time-stepped typewriter animation over a finished layout
//! - `label`: the host-facing surface tying the stages together
//!
//! ```text
//! markup string
//!   └─ tokenize ─► Token stream
//!        └─ interpret ─► StyledGlyph buffer + AnchoredTokens
//!             └─ layout ─► Layout (lines of positioned glyphs)
//!                  ├─ draw_commands (static rendering)
//!                  └─ RevealState::advance (animated rendering)
//! ```
//!
//! The engine never touches a GPU or decodes image bytes: fonts arrive
//! pre-decoded as glyph metrics plus opaque atlas region handles, and
//! rendering consumes the emitted draw commands.

pub mod font;
pub mod label;
pub mod layout;
pub mod markup;
pub mod reveal;

pub use font::{
    DistanceFieldKind, Font, FontArena, FontError, FontId, FontMetrics, Glyph, GlyphMetrics,
    RegionHandle, ResolvedGlyph, ScaledFontMetrics,
};
pub use label::Label;
pub use layout::{
    Align, DrawCommand, GlyphKind, HAlign, Layout, LayoutParams, Line, StyledGlyph, VAlign,
};
pub use markup::{
    AnchoredToken, AnchoredTokenKind, CaseMode, ColorTable, InterpretOutput, MarkupOptions, Rgba,
    ScriptMode, StyleState, Token, VariableTable, interpret, tokenize,
};
pub use reveal::{EasingFunction, RevealEvent, RevealState, RevealStatus, TypingConfig};

/// Simple helper to allow smoke tests to link against this crate.
pub fn is_available() -> bool {
    true
}
