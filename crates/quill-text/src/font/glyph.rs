/// Opaque handle naming an atlas region supplied by the host's asset
/// loader. The engine never decodes image bytes; it only threads handles
/// through to the emitted draw commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionHandle(pub u64);

impl RegionHandle {
    /// Reserved handle used by the missing-glyph placeholder. Hosts may
    /// map it to a checkerboard/box region or skip it entirely.
    pub const PLACEHOLDER: RegionHandle = RegionHandle(u64::MAX);
}

/// Per-glyph metrics in unscaled font units (pixels at scale 1.0).
///
/// `x_advance` may be negative: control characters can be remapped to
/// retracting spacers, and layout treats the negative advance uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// Visual width of the glyph bitmap.
    pub width: f32,
    /// Visual height of the glyph bitmap.
    pub height: f32,
    /// Horizontal pen advance after drawing this glyph.
    pub x_advance: f32,
    /// Horizontal offset from the pen position to the bitmap origin.
    pub x_offset: f32,
    /// Vertical offset from the baseline to the bitmap origin.
    pub y_offset: f32,
}

impl GlyphMetrics {
    /// Metrics for an invisible glyph occupying `advance` horizontal units.
    pub fn spacer(advance: f32) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            x_advance: advance,
            x_offset: 0.0,
            y_offset: 0.0,
        }
    }
}

/// One renderable unit: a code point's bitmap/distance-field region or a
/// named inline image, with its metrics. Immutable once registered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub metrics: GlyphMetrics,
    pub region: RegionHandle,
}

impl Glyph {
    pub fn new(metrics: GlyphMetrics, region: RegionHandle) -> Self {
        Self { metrics, region }
    }
}

/// Distance-field rendering mode of a font.
///
/// Orthogonal to layout logic, but carried on the font so hosts can pick
/// shaders and so the metric resize hooks know whether crispness applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceFieldKind {
    /// Plain bitmap font.
    #[default]
    None,
    /// Single-channel signed distance field.
    Sdf,
    /// Multi-channel signed distance field.
    Msdf,
    /// SDF with an outline channel.
    SdfOutline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacer_has_no_visual_extent() {
        let m = GlyphMetrics::spacer(-4.0);
        assert_eq!(m.width, 0.0);
        assert_eq!(m.height, 0.0);
        assert_eq!(m.x_advance, -4.0);
    }

    #[test]
    fn placeholder_handle_is_reserved() {
        assert_eq!(RegionHandle::PLACEHOLDER, RegionHandle(u64::MAX));
    }
}
