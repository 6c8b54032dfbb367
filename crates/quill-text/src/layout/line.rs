use crate::font::{FontId, RegionHandle};
use crate::layout::styled::StyledGlyph;

/// A glyph with its final draw geometry inside a layout.
///
/// `x`/`y` name the top-left corner of the glyph quad in layout space
/// (origin top-left, y down). Newline pseudo-glyphs keep a position for
/// caret placement but have zero size and produce no draw command.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedGlyph {
    pub glyph: StyledGlyph,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Atlas region of the resolved glyph (possibly the placeholder).
    pub region: RegionHandle,
    /// Font that actually supplied the glyph after family fallback.
    pub font: FontId,
    /// Pen advance this glyph contributed, after all scaling.
    pub advance: f32,
}

impl PositionedGlyph {
    /// True for glyphs the renderer should skip (zero-extent pseudo-glyphs).
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && !self.glyph.kind.is_newline()
    }
}

/// One laid-out line: positioned glyphs plus cached aggregate metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Glyphs in visual left-to-right order.
    pub glyphs: Vec<PositionedGlyph>,
    /// Visual width excluding trailing whitespace.
    pub width: f32,
    /// Max (ascent + descent) over fonts/scales used on this line.
    pub height: f32,
    /// Max ascent; distance from line top to baseline.
    pub ascent: f32,
    /// Max descent below baseline.
    pub descent: f32,
    /// Y of the line box top in layout space, after vertical alignment.
    pub y_offset: f32,
    /// X shift applied by horizontal alignment.
    pub x_offset: f32,
}

impl Line {
    /// Baseline Y position in layout space.
    pub fn baseline_y(&self) -> f32 {
        self.y_offset + self.ascent
    }

    /// Line box bottom.
    pub fn bottom_y(&self) -> f32 {
        self.y_offset + self.height
    }
}
