use crate::font::RegionHandle;
use crate::layout::engine::LayoutParams;
use crate::layout::line::{Line, PositionedGlyph};
use crate::markup::color::Rgba;

/// One textured quad for the host renderer to batch. The engine never
/// touches a GPU; hosts map `region` back to their atlas and submit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub region: RegionHandle,
    pub color: Rgba,
    /// Supplying font, so hosts can bind the right atlas page / SDF shader.
    pub font: crate::font::FontId,
}

/// A finished layout: wrapped lines of positioned glyphs plus the inputs
/// that produced them.
///
/// A layout goes stale whenever the source markup, the target width (under
/// wrap), any referenced font's metrics, or the max-lines/ellipsis settings
/// change; recompute by running the pipeline again. Identical inputs
/// reproduce identical lines and positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    lines: Vec<Line>,
    params: LayoutParams,
    width: f32,
    height: f32,
    truncated: bool,
}

impl Layout {
    pub(crate) fn new(
        lines: Vec<Line>,
        params: LayoutParams,
        width: f32,
        height: f32,
        truncated: bool,
    ) -> Self {
        Self {
            lines,
            params,
            width,
            height,
            truncated,
        }
    }

    /// An empty layout, used before any markup is set.
    pub fn empty() -> Self {
        Self::new(Vec::new(), LayoutParams::default(), 0.0, 0.0, false)
    }

    /// Lines in top-to-bottom order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The parameters this layout was produced with.
    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Content width (widest line, trailing whitespace excluded).
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Content height of the stacked lines.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// True when `max_lines` trimmed content and the ellipsis stands in.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Total glyph count across all lines — the reveal cursor's domain.
    pub fn glyph_count(&self) -> usize {
        self.lines.iter().map(|l| l.glyphs.len()).sum()
    }

    /// Flat iteration over glyphs in reveal order (line by line).
    pub fn glyphs(&self) -> impl Iterator<Item = &PositionedGlyph> {
        self.lines.iter().flat_map(|l| l.glyphs.iter())
    }

    /// Emit draw commands, optionally limited to the first `revealed`
    /// glyphs of the flat sequence (for typewriter rendering). Zero-extent
    /// pseudo-glyphs (newlines, spacers) are skipped.
    pub fn draw_commands(&self, revealed: Option<usize>) -> Vec<DrawCommand> {
        let limit = revealed.unwrap_or(usize::MAX);
        self.glyphs()
            .take(limit)
            .filter(|g| g.is_visible())
            .map(|g| DrawCommand {
                x: g.x,
                y: g.y,
                width: g.width,
                height: g.height,
                region: g.region,
                color: g.glyph.style.color,
                font: g.font,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{Font, FontArena, FontId, FontMetrics, GlyphMetrics};
    use crate::layout::engine::layout;
    use crate::layout::styled::{GlyphKind, StyledGlyph};
    use crate::layout::{Align, HAlign, VAlign};
    use crate::markup::style::{ScriptMode, StyleState};

    const ADV: f32 = 10.0;

    /// Monospace test font: every ASCII glyph advances 10 units.
    fn test_arena() -> (FontArena, FontId) {
        let mut arena = FontArena::new();
        let mut font = Font::new(FontMetrics {
            ascent: 8.0,
            descent: 2.0,
            line_gap: 0.0,
            cell_width: ADV,
            cell_height: 10.0,
        })
        .unwrap();
        for cp in ' '..='~' {
            font.register_glyph(
                cp,
                GlyphMetrics {
                    width: ADV,
                    height: 10.0,
                    x_advance: ADV,
                    x_offset: 0.0,
                    y_offset: 8.0,
                },
                RegionHandle(cp as u64),
            );
        }
        let id = arena.insert(font);
        (arena, id)
    }

    /// Base font plus a double-size sibling in family slot 1 ("Big").
    fn family_arena() -> (FontArena, FontId) {
        let (mut arena, base) = test_arena();
        let mut big = Font::new(FontMetrics {
            ascent: 16.0,
            descent: 4.0,
            line_gap: 0.0,
            cell_width: ADV,
            cell_height: 20.0,
        })
        .unwrap();
        for cp in ' '..='~' {
            big.register_glyph(
                cp,
                GlyphMetrics {
                    width: ADV,
                    height: 20.0,
                    x_advance: ADV,
                    x_offset: 0.0,
                    y_offset: 16.0,
                },
                RegionHandle(cp as u64),
            );
        }
        let big_id = arena.insert(big);
        arena
            .get_mut(base)
            .unwrap()
            .set_family(vec!["Main".into(), "Big".into()], vec![base, big_id])
            .unwrap();
        (arena, base)
    }

    fn glyphs_of(text: &str) -> Vec<StyledGlyph> {
        text.char_indices()
            .map(|(i, c)| StyledGlyph::new(GlyphKind::Char(c), StyleState::default(), i))
            .collect()
    }

    fn line_text(line: &Line) -> String {
        line.glyphs
            .iter()
            .filter_map(|g| match &g.glyph.kind {
                GlyphKind::Char(c) if *c != '\n' => Some(*c),
                _ => None,
            })
            .collect()
    }

    fn wrap_params(width: f32) -> LayoutParams {
        LayoutParams {
            target_width: width,
            wrap: true,
            ..LayoutParams::default()
        }
    }

    #[test]
    fn no_wrap_single_line() {
        let (arena, font) = test_arena();
        let out = layout(
            &glyphs_of("hello"),
            &arena,
            font,
            &LayoutParams::default(),
        );
        assert_eq!(out.lines().len(), 1);
        assert_eq!(out.width(), 5.0 * ADV);
        assert_eq!(out.height(), 10.0);
    }

    #[test]
    fn explicit_newline_forces_break() {
        let (arena, font) = test_arena();
        let out = layout(&glyphs_of("ab\ncd"), &arena, font, &LayoutParams::default());
        assert_eq!(out.lines().len(), 2);
        assert_eq!(line_text(&out.lines()[0]), "ab");
        assert_eq!(line_text(&out.lines()[1]), "cd");
        // The newline glyph belongs to the first line and draws nothing.
        assert_eq!(out.lines()[0].glyphs.len(), 3);
        assert_eq!(out.glyph_count(), 5);
    }

    #[test]
    fn trailing_newline_preserves_empty_line() {
        let (arena, font) = test_arena();
        let out = layout(&glyphs_of("ab\n"), &arena, font, &LayoutParams::default());
        assert_eq!(out.lines().len(), 2);
        assert!(out.lines()[1].glyphs.is_empty());
        assert_eq!(out.lines()[1].height, 10.0);
    }

    #[test]
    fn wraps_at_word_boundary() {
        let (arena, font) = test_arena();
        // "aaa bbb" at width 50 = 5 cells: "aaa " fits, "bbb" wraps.
        let out = layout(&glyphs_of("aaa bbb"), &arena, font, &wrap_params(5.0 * ADV));
        assert_eq!(out.lines().len(), 2);
        assert_eq!(line_text(&out.lines()[0]), "aaa ");
        assert_eq!(line_text(&out.lines()[1]), "bbb");
        // Trailing space doesn't count toward width.
        assert_eq!(out.lines()[0].width, 3.0 * ADV);
    }

    #[test]
    fn trailing_partial_word_moves_to_next_line() {
        let (arena, font) = test_arena();
        let out = layout(
            &glyphs_of("aa bbbb"),
            &arena,
            font,
            &wrap_params(5.0 * ADV),
        );
        // "aa bb|bb" would split the word; instead "bbbb" moves down whole.
        assert_eq!(line_text(&out.lines()[0]), "aa ");
        assert_eq!(line_text(&out.lines()[1]), "bbbb");
    }

    #[test]
    fn overlong_word_breaks_mid_word() {
        let (arena, font) = test_arena();
        let out = layout(
            &glyphs_of("abcdefghij"),
            &arena,
            font,
            &wrap_params(5.0 * ADV),
        );
        assert_eq!(out.lines().len(), 2);
        assert_eq!(line_text(&out.lines()[0]), "abcde");
        assert_eq!(line_text(&out.lines()[1]), "fghij");
    }

    #[test]
    fn width_narrower_than_one_glyph_degrades_to_one_per_line() {
        let (arena, font) = test_arena();
        let out = layout(&glyphs_of("abc"), &arena, font, &wrap_params(ADV / 2.0));
        assert_eq!(out.lines().len(), 3);
        for line in out.lines() {
            assert_eq!(line.glyphs.len(), 1);
        }
    }

    #[test]
    fn every_line_fits_target_width() {
        let (arena, font) = test_arena();
        let target = 7.0 * ADV;
        let out = layout(
            &glyphs_of("the quick brown fox jumps over the lazy dog"),
            &arena,
            font,
            &wrap_params(target),
        );
        for line in out.lines() {
            assert!(
                line.width <= target,
                "line {:?} wider than target",
                line_text(line)
            );
        }
    }

    #[test]
    fn max_lines_appends_ellipsis_within_width() {
        let (arena, font) = test_arena();
        let params = LayoutParams {
            max_lines: 1,
            ellipsis: "...".into(),
            ..wrap_params(5.0 * ADV)
        };
        let out = layout(&glyphs_of("aaaaa bbbbb ccccc"), &arena, font, &params);
        assert_eq!(out.lines().len(), 1);
        assert!(out.truncated());
        let text = line_text(&out.lines()[0]);
        assert!(text.ends_with("..."), "got {text:?}");
        assert!(out.lines()[0].width <= 5.0 * ADV);
    }

    #[test]
    fn ellipsis_inherits_truncation_point_style() {
        let (arena, font) = test_arena();
        let mut glyphs = glyphs_of("aaaaaaa bbbbbbb");
        let red = crate::markup::color::Rgba::rgb(255, 0, 0);
        for g in glyphs.iter_mut().skip(5) {
            g.style.color = red;
        }
        let params = LayoutParams {
            max_lines: 1,
            ..wrap_params(7.0 * ADV)
        };
        let out = layout(&glyphs, &arena, font, &params);
        let last = out.lines().last().unwrap();
        let dots: Vec<_> = last
            .glyphs
            .iter()
            .filter(|g| matches!(&g.glyph.kind, GlyphKind::Char('.')))
            .collect();
        assert_eq!(dots.len(), 3);
        assert!(dots.iter().all(|g| g.glyph.style.color == red));
    }

    #[test]
    fn mixed_family_line_uses_tallest_font_metrics() {
        let (arena, font) = family_arena();
        let mut glyphs = glyphs_of("ab");
        glyphs[1].style.family = 1;
        let out = layout(&glyphs, &arena, font, &LayoutParams::default());
        let line = &out.lines()[0];
        assert_eq!(line.ascent, 16.0);
        assert_eq!(line.descent, 4.0);
        assert_eq!(line.height, 20.0);
        assert_eq!(out.height(), 20.0);
        // Both glyphs hang from the taller baseline at y = 16.
        assert_eq!(line.glyphs[0].y, 8.0);
        assert_eq!(line.glyphs[1].y, 0.0);
    }

    #[test]
    fn scaled_run_raises_line_height() {
        let (arena, font) = test_arena();
        let mut glyphs = glyphs_of("ab");
        glyphs[1].style.scale = 2.0;
        let out = layout(&glyphs, &arena, font, &LayoutParams::default());
        let line = &out.lines()[0];
        assert_eq!(line.ascent, 16.0);
        assert_eq!(line.descent, 4.0);
        assert_eq!(line.height, 20.0);
        assert_eq!(line.glyphs[0].y, 8.0);
        assert_eq!(line.glyphs[1].y, 0.0);
        assert_eq!(line.glyphs[1].height, 20.0);
    }

    #[test]
    fn script_modes_shift_half_scale_glyphs() {
        let (arena, font) = test_arena();
        let mut glyphs = glyphs_of("abcd");
        glyphs[1].style.script = ScriptMode::Super;
        glyphs[2].style.script = ScriptMode::Sub;
        glyphs[3].style.script = ScriptMode::Mid;
        let out = layout(&glyphs, &arena, font, &LayoutParams::default());
        let line = &out.lines()[0];
        // Scripts render at half scale; the full-size glyph sets the line.
        assert_eq!(line.ascent, 8.0);
        assert_eq!(line.glyphs[0].y, 0.0);
        // Super: half-scale baseline seat (y = 4) lifted by half the
        // scaled cell height (2.5).
        assert_eq!(line.glyphs[1].y, 1.5);
        // Sub keeps the baseline seat.
        assert_eq!(line.glyphs[2].y, 4.0);
        // Mid lifts by a quarter of the scaled cell height (1.25).
        assert_eq!(line.glyphs[3].y, 2.75);
        assert!(line.glyphs[1].y < line.glyphs[3].y);
        assert!(line.glyphs[3].y < line.glyphs[2].y);
    }

    #[test]
    fn layout_is_deterministic() {
        let (arena, font) = test_arena();
        let glyphs = glyphs_of("the quick brown fox\njumps over");
        let params = wrap_params(8.0 * ADV);
        let a = layout(&glyphs, &arena, font, &params);
        let b = layout(&glyphs, &arena, font, &params);
        assert_eq!(a, b);
    }

    #[test]
    fn center_alignment_offsets_lines() {
        let (arena, font) = test_arena();
        let params = LayoutParams {
            target_width: 10.0 * ADV,
            align: Align::new(HAlign::Center, VAlign::Top),
            ..LayoutParams::default()
        };
        let out = layout(&glyphs_of("abcd"), &arena, font, &params);
        // (100 - 40) / 2 = 30.
        assert_eq!(out.lines()[0].x_offset, 3.0 * ADV);
        assert_eq!(out.lines()[0].glyphs[0].x, 3.0 * ADV);
    }

    #[test]
    fn bottom_alignment_uses_target_height() {
        let (arena, font) = test_arena();
        let params = LayoutParams {
            target_height: Some(100.0),
            align: Align::new(HAlign::Left, VAlign::Bottom),
            ..LayoutParams::default()
        };
        let out = layout(&glyphs_of("x"), &arena, font, &params);
        assert_eq!(out.lines()[0].y_offset, 90.0);
    }

    #[test]
    fn integer_positions_round_only_final_output() {
        let (arena, font) = test_arena();
        let mut glyphs = glyphs_of("abcdefgh");
        for g in &mut glyphs {
            g.style.scale = 1.07; // accumulates fractional advances
        }
        let params = LayoutParams {
            integer_positions: true,
            ..LayoutParams::default()
        };
        let out = layout(&glyphs, &arena, font, &params);
        for g in out.glyphs() {
            assert_eq!(g.x, g.x.round());
            assert_eq!(g.y, g.y.round());
        }
        // Accumulation stayed fractional: successive X gaps differ, which
        // only happens when rounding is applied after accumulation.
        let xs: Vec<f32> = out.glyphs().map(|g| g.x).collect();
        let gaps: Vec<f32> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(gaps.iter().any(|g| (g - gaps[0]).abs() > 0.0));
    }

    #[test]
    fn negative_advance_retracts_pen() {
        let (arena, mut_font) = {
            let (mut arena, font) = test_arena();
            arena.get_mut(font).unwrap().register_glyph(
                '\u{8}',
                GlyphMetrics::spacer(-ADV),
                RegionHandle(0),
            );
            (arena, font)
        };
        let out = layout(
            &glyphs_of("ab\u{8}c"),
            &arena,
            mut_font,
            &LayoutParams::default(),
        );
        let xs: Vec<f32> = out.lines()[0].glyphs.iter().map(|g| g.x).collect();
        // 'c' overstrikes 'b' after the backspace glyph.
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[1], ADV);
        assert_eq!(xs[3], ADV);
    }

    #[test]
    fn draw_commands_skip_invisible_and_respect_reveal_limit() {
        let (arena, font) = test_arena();
        let out = layout(&glyphs_of("ab\ncd"), &arena, font, &LayoutParams::default());
        let all = out.draw_commands(None);
        assert_eq!(all.len(), 4); // newline draws nothing
        let partial = out.draw_commands(Some(3));
        assert_eq!(partial.len(), 2); // "ab" + invisible newline
    }

    #[test]
    fn glyph_count_is_stable_under_relayout() {
        let (arena, font) = test_arena();
        let glyphs = glyphs_of("hello world");
        let a = layout(&glyphs, &arena, font, &wrap_params(6.0 * ADV));
        let b = layout(&glyphs, &arena, font, &wrap_params(20.0 * ADV));
        assert_eq!(a.glyph_count(), b.glyph_count());
    }
}
