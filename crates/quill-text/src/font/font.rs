use hashbrown::HashMap;

use crate::font::glyph::{DistanceFieldKind, Glyph, GlyphMetrics, RegionHandle};
use crate::font::metrics::{FontMetrics, ScaledFontMetrics};
use crate::font::{FontError, FontId, Result};

/// An atlas-backed font: glyph tables keyed by code point and by symbolic
/// image name, cell metrics, scale factors, distance-field parameters, and
/// an ordered family of sibling fonts for fallback and `[@Name]` switches.
///
/// All registered metrics are stored unscaled; the current scale factors
/// are applied on access. Repeated rescaling is therefore exact rather than
/// cumulatively lossy.
///
/// Mutating a font (rescale, glyph remap) silently invalidates every layout
/// still referencing it; callers must re-layout afterwards.
#[derive(Debug, Clone)]
pub struct Font {
    /// Code point → glyph. Last registration wins.
    glyphs: HashMap<u32, Glyph>,
    /// Symbolic name → inline-image glyph, addressable via `[+name]`.
    images: HashMap<String, Glyph>,
    /// Unscaled font-level metrics.
    metrics: FontMetrics,
    /// Current scale factors (x, y).
    scale: (f32, f32),
    /// Distance-field rendering mode.
    distance_field: DistanceFieldKind,
    /// Shader resize sharpness for distance-field modes.
    crispness: f32,
    /// Ordered sibling fonts; slot 0 conventionally the font itself.
    family: Vec<FontId>,
    /// Parallel family names for `[@Name]` lookup (case-insensitive).
    family_names: Vec<String>,
    /// Glyph drawn when every fallback misses.
    missing: Glyph,
}

impl Font {
    /// Create a font with the given unscaled metrics.
    pub fn new(metrics: FontMetrics) -> Result<Self> {
        if metrics.cell_width <= 0.0 || metrics.cell_height <= 0.0 {
            return Err(FontError::InvalidCellSize {
                width: metrics.cell_width,
                height: metrics.cell_height,
            });
        }
        let missing = Glyph::new(
            GlyphMetrics {
                width: metrics.cell_width,
                height: metrics.cell_height,
                x_advance: metrics.cell_width,
                x_offset: 0.0,
                y_offset: 0.0,
            },
            RegionHandle::PLACEHOLDER,
        );
        Ok(Self {
            glyphs: HashMap::new(),
            images: HashMap::new(),
            metrics,
            scale: (1.0, 1.0),
            distance_field: DistanceFieldKind::None,
            crispness: 1.0,
            family: Vec::new(),
            family_names: Vec::new(),
            missing,
        })
    }

    /// Register or overwrite the glyph for a code point. Last write wins,
    /// which supports runtime remapping (e.g. repurposing control
    /// characters as custom-width spacers).
    pub fn register_glyph(&mut self, cp: char, metrics: GlyphMetrics, region: RegionHandle) {
        self.glyphs.insert(cp as u32, Glyph::new(metrics, region));
    }

    /// Register or overwrite a named inline image.
    pub fn register_image(&mut self, name: &str, metrics: GlyphMetrics, region: RegionHandle) {
        self.images
            .insert(name.to_string(), Glyph::new(metrics, region));
    }

    /// Local glyph lookup, unscaled. Family fallback lives on the arena.
    pub fn glyph(&self, cp: char) -> Option<&Glyph> {
        self.glyphs.get(&(cp as u32))
    }

    /// Local inline-image lookup, unscaled.
    pub fn image(&self, name: &str) -> Option<&Glyph> {
        self.images.get(name)
    }

    /// The placeholder used when every fallback misses.
    pub fn missing_glyph(&self) -> &Glyph {
        &self.missing
    }

    /// Replace the missing-glyph placeholder.
    pub fn set_missing_glyph(&mut self, glyph: Glyph) {
        self.missing = glyph;
    }

    /// Set the current scale factors. Factors multiply the original
    /// unscaled metrics, so `set_scale(1.0, 1.0)` always restores the
    /// registered values exactly.
    pub fn set_scale(&mut self, sx: f32, sy: f32) {
        self.scale = (sx, sy);
    }

    /// Current scale factors (x, y).
    pub fn scale(&self) -> (f32, f32) {
        self.scale
    }

    /// Unscaled font metrics as registered.
    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// Font metrics with the current scale factors applied.
    pub fn scaled_metrics(&self) -> ScaledFontMetrics {
        self.metrics.scaled(self.scale.0, self.scale.1)
    }

    /// Apply the current scale factors to a glyph's metrics.
    pub fn scale_glyph_metrics(&self, metrics: GlyphMetrics) -> GlyphMetrics {
        let (sx, sy) = self.scale;
        GlyphMetrics {
            width: metrics.width * sx,
            height: metrics.height * sy,
            x_advance: metrics.x_advance * sx,
            x_offset: metrics.x_offset * sx,
            y_offset: metrics.y_offset * sy,
        }
    }

    /// Distance-field rendering mode.
    pub fn distance_field(&self) -> DistanceFieldKind {
        self.distance_field
    }

    pub fn set_distance_field(&mut self, kind: DistanceFieldKind) {
        self.distance_field = kind;
    }

    /// Shader resize sharpness for distance-field modes.
    pub fn crispness(&self) -> f32 {
        self.crispness
    }

    pub fn set_crispness(&mut self, crispness: f32) {
        self.crispness = crispness;
    }

    /// Establish the sibling family. Slot 0 conventionally names the font
    /// itself; self-references are allowed because members are id-addressed
    /// rather than owned.
    pub fn set_family(&mut self, names: Vec<String>, fonts: Vec<FontId>) -> Result<()> {
        if names.len() != fonts.len() {
            return Err(FontError::FamilyLengthMismatch {
                names: names.len(),
                fonts: fonts.len(),
            });
        }
        self.family_names = names;
        self.family = fonts;
        Ok(())
    }

    /// Ordered family members.
    pub fn family(&self) -> &[FontId] {
        &self.family
    }

    /// Look up a family member by case-insensitive name.
    pub fn family_member(&self, name: &str) -> Option<FontId> {
        self.family_names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .map(|idx| self.family[idx])
    }

    /// Look up a family member by slot index.
    pub fn family_slot(&self, slot: usize) -> Option<FontId> {
        self.family.get(slot).copied()
    }

    /// Slot index of a family member by case-insensitive name, for
    /// `[@Name]` switches (styles store slots, not ids).
    pub fn family_slot_index(&self, name: &str) -> Option<usize> {
        self.family_names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_metrics() -> FontMetrics {
        FontMetrics {
            ascent: 8.0,
            descent: 2.0,
            line_gap: 0.0,
            cell_width: 6.0,
            cell_height: 10.0,
        }
    }

    #[test]
    fn rejects_non_positive_cell_size() {
        let bad = FontMetrics {
            cell_width: 0.0,
            ..test_metrics()
        };
        assert!(Font::new(bad).is_err());
    }

    #[test]
    fn last_registration_wins() {
        let mut font = Font::new(test_metrics()).unwrap();
        font.register_glyph('a', GlyphMetrics::spacer(6.0), RegionHandle(1));
        font.register_glyph('a', GlyphMetrics::spacer(3.0), RegionHandle(2));
        let g = font.glyph('a').unwrap();
        assert_eq!(g.metrics.x_advance, 3.0);
        assert_eq!(g.region, RegionHandle(2));
    }

    #[test]
    fn rescaling_is_exact_not_cumulative() {
        let mut font = Font::new(test_metrics()).unwrap();
        font.register_glyph('a', GlyphMetrics::spacer(6.0), RegionHandle(1));

        font.set_scale(2.0, 2.0);
        font.set_scale(3.0, 3.0);
        let g = font.scale_glyph_metrics(font.glyph('a').unwrap().metrics);
        assert_eq!(g.x_advance, 18.0);

        // Back to 1.0 restores the registered values exactly.
        font.set_scale(1.0, 1.0);
        let g = font.scale_glyph_metrics(font.glyph('a').unwrap().metrics);
        assert_eq!(g.x_advance, 6.0);
        assert_eq!(font.scaled_metrics().cell_height, 10.0);
    }

    #[test]
    fn negative_advance_spacer_round_trips() {
        let mut font = Font::new(test_metrics()).unwrap();
        font.register_glyph('\u{8}', GlyphMetrics::spacer(-6.0), RegionHandle(0));
        assert_eq!(font.glyph('\u{8}').unwrap().metrics.x_advance, -6.0);
    }

    #[test]
    fn family_name_lookup_is_case_insensitive() {
        let mut font = Font::new(test_metrics()).unwrap();
        font.set_family(
            vec!["Main".into(), "Emoji".into()],
            vec![FontId(0), FontId(1)],
        )
        .unwrap();
        assert_eq!(font.family_member("emoji"), Some(FontId(1)));
        assert_eq!(font.family_member("EMOJI"), Some(FontId(1)));
        assert_eq!(font.family_member("missing"), None);
    }

    #[test]
    fn mismatched_family_lists_error() {
        let mut font = Font::new(test_metrics()).unwrap();
        let err = font.set_family(vec!["Main".into()], vec![]);
        assert!(err.is_err());
    }
}
