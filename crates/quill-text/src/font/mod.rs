pub mod arena;
pub mod font;
pub mod glyph;
pub mod metrics;

pub use arena::{FontArena, FontId, ResolvedGlyph};
pub use font::Font;
pub use glyph::{DistanceFieldKind, Glyph, GlyphMetrics, RegionHandle};
pub use metrics::{FontMetrics, ScaledFontMetrics};

use thiserror::Error;

/// Errors that can occur while constructing fonts.
///
/// Data-driven lookups (missing glyphs, unknown image names) never error;
/// they resolve through fallback chains instead. These variants cover
/// contract violations at construction time only.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("font cell size must be positive, got {width}x{height}")]
    InvalidCellSize { width: f32, height: f32 },
    #[error("family name list and font list lengths differ ({names} vs {fonts})")]
    FamilyLengthMismatch { names: usize, fonts: usize },
}

/// Convenient result alias for font-related operations.
pub type Result<T> = std::result::Result<T, FontError>;
