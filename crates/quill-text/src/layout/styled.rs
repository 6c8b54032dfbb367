use crate::markup::style::StyleState;

/// What a styled glyph renders as.
#[derive(Debug, Clone, PartialEq)]
pub enum GlyphKind {
    /// A code point resolved through the font/family tables at layout
    /// time. `'\n'` is carried through as a forced line break and never
    /// produces a draw command.
    Char(char),
    /// A named inline image (`[+name]`), resolved through the font's
    /// image table at layout time.
    Image(String),
}

impl GlyphKind {
    /// True for the forced-break newline pseudo-glyph.
    pub fn is_newline(&self) -> bool {
        matches!(self, GlyphKind::Char('\n'))
    }

    /// True for glyphs that count as literal text. Inline images are
    /// excluded from character accounting.
    pub fn is_text(&self) -> bool {
        matches!(self, GlyphKind::Char(c) if *c != '\n')
    }
}

/// One glyph (or inline image) tagged with the style in effect when it was
/// emitted and the byte offset of the markup it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledGlyph {
    pub kind: GlyphKind,
    pub style: StyleState,
    /// Byte offset into the original markup string, for caret/selection
    /// mapping.
    pub source: usize,
}

impl StyledGlyph {
    pub fn new(kind: GlyphKind, style: StyleState, source: usize) -> Self {
        Self {
            kind,
            style,
            source,
        }
    }
}
