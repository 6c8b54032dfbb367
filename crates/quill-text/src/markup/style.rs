//! Style attributes and the per-category stacks that scope them.
//!
//! Markup tags close independently and out of nesting order in practice
//! (open bold, open color, close bold — color must survive), so there is
//! one implicit stack per attribute category rather than a single
//! polymorphic stack. Boolean attributes are toggles and need no stack.

use serde::{Deserialize, Serialize};

use crate::markup::color::Rgba;

/// Vertical script position of a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptMode {
    #[default]
    Normal,
    /// `[.]` — lowered, half scale.
    Sub,
    /// `[=]` — mid-raised, half scale.
    Mid,
    /// `[^]` — raised, half scale.
    Super,
}

/// Case transform applied to emitted characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    #[default]
    Normal,
    /// `[!]` — every character uppercased.
    Upper,
    /// `[,]` — every character lowercased.
    Lower,
    /// `[;]` — first character of each word uppercased.
    Capitalize,
}

/// Snapshot of every active markup attribute at one glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleState {
    /// Foreground color.
    pub color: Rgba,
    /// Optional background fill behind the glyph cell.
    pub bg_color: Option<Rgba>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub script: ScriptMode,
    pub case: CaseMode,
    /// Size multiplier, 1.0 = 100%.
    pub scale: f32,
    /// Family slot index on the active font (0 = the font itself).
    pub family: usize,
    /// Active named effect, if any.
    pub effect: Option<String>,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            bg_color: None,
            bold: false,
            italic: false,
            underline: false,
            strike: false,
            script: ScriptMode::Normal,
            case: CaseMode::Normal,
            scale: 1.0,
            family: 0,
            effect: None,
        }
    }
}

impl StyleState {
    pub fn with_color(color: Rgba) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Effective glyph scale: the style scale, halved for scripts.
    pub fn effective_scale(&self) -> f32 {
        match self.script {
            ScriptMode::Normal => self.scale,
            _ => self.scale * 0.5,
        }
    }
}

/// Per-category stacks for scoped attributes. A closing tag pops its own
/// category only; an empty stack means "base value".
#[derive(Debug, Default)]
pub struct StyleStacks {
    pub color: Vec<Rgba>,
    pub scale: Vec<f32>,
    pub family: Vec<usize>,
}

impl StyleStacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything, returning every category to the base style.
    pub fn clear(&mut self) {
        self.color.clear();
        self.scale.clear();
        self.family.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_halves_effective_scale() {
        let mut style = StyleState::default();
        style.scale = 2.0;
        assert_eq!(style.effective_scale(), 2.0);
        style.script = ScriptMode::Super;
        assert_eq!(style.effective_scale(), 1.0);
    }

    #[test]
    fn default_style_is_white_and_plain() {
        let style = StyleState::default();
        assert_eq!(style.color, Rgba::WHITE);
        assert!(!style.bold);
        assert_eq!(style.scale, 1.0);
        assert_eq!(style.family, 0);
    }
}
