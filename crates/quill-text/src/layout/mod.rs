pub mod engine;
pub mod layout;
pub mod line;
pub mod styled;

pub use engine::{LayoutParams, layout};
pub use layout::{DrawCommand, Layout};
pub use line::{Line, PositionedGlyph};
pub use styled::{GlyphKind, StyledGlyph};

use serde::{Deserialize, Serialize};

/// Horizontal placement of each line inside the bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical placement of the line block inside the bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Combined alignment. Repositioning only: alignment never re-runs the
/// wrap computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Align {
    pub h: HAlign,
    pub v: VAlign,
}

impl Align {
    pub const fn new(h: HAlign, v: VAlign) -> Self {
        Self { h, v }
    }

    pub const fn center() -> Self {
        Self::new(HAlign::Center, VAlign::Middle)
    }
}
