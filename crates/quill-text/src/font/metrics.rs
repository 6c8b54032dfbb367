/// Font-level metrics in unscaled font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Ascent above baseline (positive).
    pub ascent: f32,
    /// Descent below baseline (positive).
    pub descent: f32,
    /// Line gap (leading).
    pub line_gap: f32,
    /// Nominal cell width, used for inline-image sizing and caret placement.
    pub cell_width: f32,
    /// Nominal cell height.
    pub cell_height: f32,
}

impl FontMetrics {
    /// Calculate line height (ascent + descent + line_gap).
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.line_gap
    }

    /// Apply scale factors, producing pixel-space metrics.
    pub fn scaled(&self, sx: f32, sy: f32) -> ScaledFontMetrics {
        ScaledFontMetrics {
            ascent: self.ascent * sy,
            descent: self.descent * sy,
            line_gap: self.line_gap * sy,
            cell_width: self.cell_width * sx,
            cell_height: self.cell_height * sy,
        }
    }
}

/// Font metrics after the font's current scale factors are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledFontMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl ScaledFontMetrics {
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.line_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_is_proportional() {
        let m = FontMetrics {
            ascent: 8.0,
            descent: 2.0,
            line_gap: 1.0,
            cell_width: 6.0,
            cell_height: 12.0,
        };
        let s = m.scaled(2.0, 3.0);
        assert_eq!(s.cell_width, 12.0);
        assert_eq!(s.cell_height, 36.0);
        assert_eq!(s.line_height(), 33.0);
    }
}
