//! The wrap/positioning pass: styled glyphs in, positioned lines out.
//!
//! The algorithm is a greedy accumulator:
//! 1. walk glyphs, breaking on `\n` and, when wrapping, at the last UAX-14
//!    break opportunity that fits the target width;
//! 2. overlong single words force a mid-word break at a grapheme boundary;
//! 3. a target width narrower than one glyph degrades to one glyph per
//!    line rather than looping;
//! 4. past `max_lines`, the ellipsis replaces trimmed content in the style
//!    active at the truncation point;
//! 5. alignment and integer rounding are post-passes over finished lines.
//!
//! All intermediate arithmetic stays in floating point; `integer_positions`
//! rounds final positions only, so rounding error never compounds across a
//! line. Identical inputs reproduce identical output.

use unicode_linebreak::linebreaks;
use unicode_segmentation::UnicodeSegmentation;

use crate::font::{FontArena, FontId, RegionHandle, ResolvedGlyph};
use crate::layout::layout::Layout;
use crate::layout::line::{Line, PositionedGlyph};
use crate::layout::styled::{GlyphKind, StyledGlyph};
use crate::layout::{Align, HAlign, VAlign};
use crate::markup::style::{ScriptMode, StyleState};

/// Inputs to [`layout`] other than the glyphs themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    /// Wrap/alignment width. `f32::INFINITY` means unconstrained.
    pub target_width: f32,
    /// Bounding-box height for vertical alignment; `None` uses the
    /// content height (making vertical alignment a no-op).
    pub target_height: Option<f32>,
    /// Wrap at the target width. Explicit newlines always break.
    pub wrap: bool,
    /// Maximum produced lines; `0` means unlimited.
    pub max_lines: usize,
    /// Marker appended when content is truncated by `max_lines`.
    pub ellipsis: String,
    pub align: Align,
    /// Round final glyph positions to whole units (pixel-art fonts).
    pub integer_positions: bool,
    /// Extra spacing between stacked lines.
    pub line_spacing: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            target_width: f32::INFINITY,
            target_height: None,
            wrap: false,
            max_lines: 0,
            ellipsis: "...".to_string(),
            align: Align::default(),
            integer_positions: false,
            line_spacing: 0.0,
        }
    }
}

/// A styled glyph resolved against the arena, with its scaled advance.
#[derive(Debug, Clone)]
struct Measured {
    glyph: StyledGlyph,
    resolved: ResolvedGlyph,
    /// Pen advance after font scale and style scale.
    advance: f32,
    /// Combined horizontal scale (font x-scale × style scale).
    sx: f32,
    /// Combined vertical scale.
    sy: f32,
}

/// Lay out a styled glyph sequence.
///
/// `base_font` is the font family slots index against; a glyph whose style
/// names family slot `k` starts resolution at that sibling.
pub fn layout(
    glyphs: &[StyledGlyph],
    fonts: &FontArena,
    base_font: FontId,
    params: &LayoutParams,
) -> Layout {
    let measured: Vec<Measured> = glyphs
        .iter()
        .map(|g| measure(g, fonts, base_font))
        .collect();

    let mut ranges = break_lines(&measured, params);
    let mut extra_tail: Vec<Measured> = Vec::new();
    let mut truncated = false;

    if params.max_lines > 0 && ranges.len() > params.max_lines {
        truncated = true;
        ranges.truncate(params.max_lines);
        extra_tail = build_ellipsis(&ranges, glyphs, fonts, base_font, params);
        if let Some(last) = ranges.last_mut() {
            trim_for_ellipsis(&measured, last, &extra_tail, params);
        }
    }

    let mut lines = position_lines(&measured, &ranges, &extra_tail, fonts, base_font, params);
    let width = lines.iter().map(|l| l.width).fold(0.0f32, f32::max);
    let height = lines.last().map(|l| l.bottom_y()).unwrap_or(0.0);

    align_lines(&mut lines, params);

    if params.integer_positions {
        for line in &mut lines {
            for glyph in &mut line.glyphs {
                glyph.x = glyph.x.round();
                glyph.y = glyph.y.round();
            }
        }
    }

    Layout::new(lines, params.clone(), width, height, truncated)
}

fn measure(glyph: &StyledGlyph, fonts: &FontArena, base_font: FontId) -> Measured {
    let start = start_font(&glyph.style, fonts, base_font);
    let style_scale = glyph.style.effective_scale();

    if glyph.kind.is_newline() {
        // Forced break carrier: zero metrics, never drawn.
        let resolved = ResolvedGlyph {
            glyph: crate::font::Glyph::new(
                crate::font::GlyphMetrics::spacer(0.0),
                RegionHandle::PLACEHOLDER,
            ),
            font: start,
            is_placeholder: false,
        };
        return Measured {
            glyph: glyph.clone(),
            resolved,
            advance: 0.0,
            sx: style_scale,
            sy: style_scale,
        };
    }

    let resolved = match &glyph.kind {
        GlyphKind::Char(c) => fonts.resolve(start, *c),
        GlyphKind::Image(name) => fonts.resolve_image(start, name),
    };
    let (fsx, fsy) = fonts
        .get(resolved.font)
        .map(|f| f.scale())
        .unwrap_or((1.0, 1.0));
    let sx = fsx * style_scale;
    let sy = fsy * style_scale;
    Measured {
        glyph: glyph.clone(),
        resolved,
        advance: resolved.glyph.metrics.x_advance * sx,
        sx,
        sy,
    }
}

/// Font to start fallback resolution at, honoring the style's family slot.
fn start_font(style: &StyleState, fonts: &FontArena, base_font: FontId) -> FontId {
    if style.family == 0 {
        return base_font;
    }
    fonts
        .get(base_font)
        .and_then(|f| f.family_slot(style.family))
        .unwrap_or(base_font)
}

/// Greedy line breaking over measured glyphs. Returns glyph index ranges;
/// a range includes its terminating newline glyph when one exists.
fn break_lines(measured: &[Measured], params: &LayoutParams) -> Vec<std::ops::Range<usize>> {
    let n = measured.len();

    // Flattened text for UAX-14 opportunities and grapheme boundaries.
    // Inline images participate as the object replacement character.
    let mut flat = String::new();
    let mut byte_to_glyph: Vec<usize> = Vec::new();
    for (i, m) in measured.iter().enumerate() {
        let ch = match &m.glyph.kind {
            GlyphKind::Char(c) => *c,
            GlyphKind::Image(_) => '\u{FFFC}',
        };
        for _ in 0..ch.len_utf8() {
            byte_to_glyph.push(i);
        }
        flat.push(ch);
    }

    // allowed[i]: a line may end just before glyph i.
    let mut allowed = vec![false; n + 1];
    for (offset, _) in linebreaks(&flat) {
        if offset < flat.len() {
            allowed[byte_to_glyph[offset]] = true;
        }
    }
    // grapheme_start[i]: glyph i begins a grapheme cluster (safe forced break).
    let mut grapheme_start = vec![false; n + 1];
    for (offset, _) in flat.grapheme_indices(true) {
        grapheme_start[byte_to_glyph[offset]] = true;
    }
    grapheme_start[n] = true;

    let wrap = params.wrap && params.target_width.is_finite();
    let target = params.target_width;

    let mut ranges = Vec::new();
    let mut start = 0usize;
    let mut pen = 0.0f32;
    let mut last_break: Option<usize> = None;
    let mut i = 0usize;

    while i < n {
        let m = &measured[i];
        if m.glyph.kind.is_newline() {
            ranges.push(start..i + 1);
            start = i + 1;
            pen = 0.0;
            last_break = None;
            i += 1;
            continue;
        }

        if allowed[i] && i > start {
            last_break = Some(i);
        }

        let is_ws = matches!(&m.glyph.kind, GlyphKind::Char(c) if c.is_whitespace());

        // Trailing whitespace may overhang; it never triggers a wrap.
        if wrap && !is_ws && i > start && pen + m.advance > target {
            let break_at = match last_break {
                Some(b) if b > start => b,
                // Overlong word: force a break at the nearest grapheme
                // boundary at or before this glyph.
                _ => {
                    let mut b = i;
                    while b > start + 1 && !grapheme_start[b] {
                        b -= 1;
                    }
                    b
                }
            };
            ranges.push(start..break_at);
            start = break_at;
            pen = measured[start..i].iter().map(|m| m.advance).sum();
            last_break = (start + 1..=i).rev().find(|&j| allowed[j]);
            // Re-test glyph i against the fresh line.
            continue;
        }

        pen += m.advance;
        i += 1;
    }

    if start < n || n == 0 || measured[n - 1].glyph.kind.is_newline() {
        ranges.push(start..n);
    }
    ranges
}

/// Build the measured ellipsis glyphs in the style active at the
/// truncation point.
fn build_ellipsis(
    ranges: &[std::ops::Range<usize>],
    glyphs: &[StyledGlyph],
    fonts: &FontArena,
    base_font: FontId,
    params: &LayoutParams,
) -> Vec<Measured> {
    let cut = ranges.last().map(|r| r.end).unwrap_or(0);
    // Style of the first trimmed glyph, else of the last retained one.
    let style = glyphs
        .get(cut)
        .or_else(|| cut.checked_sub(1).and_then(|i| glyphs.get(i)))
        .map(|g| g.style.clone())
        .unwrap_or_default();
    let source = glyphs.get(cut).map(|g| g.source).unwrap_or(0);

    params
        .ellipsis
        .chars()
        .map(|c| {
            measure(
                &StyledGlyph::new(GlyphKind::Char(c), style.clone(), source),
                fonts,
                base_font,
            )
        })
        .collect()
}

/// Trim the retained last line until the ellipsis fits the target width.
fn trim_for_ellipsis(
    measured: &[Measured],
    last: &mut std::ops::Range<usize>,
    ellipsis: &[Measured],
    params: &LayoutParams,
) {
    let ell_width: f32 = ellipsis.iter().map(|m| m.advance).sum();
    if !params.target_width.is_finite() {
        return;
    }
    loop {
        let slice = &measured[last.clone()];
        // Drop the trailing newline and whitespace before appending.
        if let Some(m) = slice.last() {
            let drop = m.glyph.kind.is_newline()
                || matches!(&m.glyph.kind, GlyphKind::Char(c) if c.is_whitespace());
            if drop {
                last.end -= 1;
                continue;
            }
        }
        let width: f32 = slice.iter().map(|m| m.advance).sum();
        if last.start == last.end || width + ell_width <= params.target_width {
            break;
        }
        last.end -= 1;
    }
}

/// Positioning pass: pen advances, baselines, script shifts.
fn position_lines(
    measured: &[Measured],
    ranges: &[std::ops::Range<usize>],
    extra_tail: &[Measured],
    fonts: &FontArena,
    base_font: FontId,
    params: &LayoutParams,
) -> Vec<Line> {
    let base_metrics = fonts
        .get(base_font)
        .map(|f| f.scaled_metrics())
        .unwrap_or(crate::font::FontMetrics {
            ascent: 0.0,
            descent: 0.0,
            line_gap: 0.0,
            cell_width: 1.0,
            cell_height: 1.0,
        }
        .scaled(1.0, 1.0));
    let line_advance_gap = base_metrics.line_gap + params.line_spacing;

    let mut lines = Vec::with_capacity(ranges.len());
    let mut y = 0.0f32;
    let last_idx = ranges.len().saturating_sub(1);

    for (li, range) in ranges.iter().enumerate() {
        let mut members: Vec<&Measured> = measured[range.clone()].iter().collect();
        if li == last_idx {
            members.extend(extra_tail.iter());
        }

        // Line metrics: max scaled ascent/descent across members, so mixed
        // fonts and scales never clip the taller font.
        let mut ascent = 0.0f32;
        let mut descent = 0.0f32;
        for m in &members {
            if m.glyph.kind.is_newline() {
                continue;
            }
            let fm = fonts
                .get(m.resolved.font)
                .map(|f| f.scaled_metrics())
                .unwrap_or(base_metrics);
            let style_scale = m.glyph.style.effective_scale();
            ascent = ascent.max(fm.ascent * style_scale);
            descent = descent.max(fm.descent * style_scale);
        }
        if members.iter().all(|m| m.glyph.kind.is_newline()) || members.is_empty() {
            ascent = base_metrics.ascent;
            descent = base_metrics.descent;
        }
        let height = ascent + descent;
        let baseline = y + ascent;

        let mut glyphs = Vec::with_capacity(members.len());
        let mut pen = 0.0f32;
        let mut trimmed_width = 0.0f32;
        for m in &members {
            let metrics = m.resolved.glyph.metrics;
            let cell_h = fonts
                .get(m.resolved.font)
                .map(|f| f.scaled_metrics().cell_height)
                .unwrap_or(base_metrics.cell_height)
                * m.glyph.style.effective_scale();
            let shift = script_shift(m.glyph.style.script, cell_h);
            let x = pen + metrics.x_offset * m.sx;
            let glyph_top = baseline - metrics.y_offset * m.sy + shift;
            glyphs.push(PositionedGlyph {
                glyph: m.glyph.clone(),
                x,
                y: glyph_top,
                width: metrics.width * m.sx,
                height: metrics.height * m.sy,
                region: m.resolved.glyph.region,
                font: m.resolved.font,
                advance: m.advance,
            });
            pen += m.advance;
            let is_trailing_ws = m.glyph.kind.is_newline()
                || matches!(&m.glyph.kind, GlyphKind::Char(c) if c.is_whitespace());
            if !is_trailing_ws {
                trimmed_width = pen;
            }
        }

        lines.push(Line {
            glyphs,
            width: trimmed_width.max(0.0),
            height,
            ascent,
            descent,
            y_offset: y,
            x_offset: 0.0,
        });
        y += height + line_advance_gap;
    }

    lines
}

/// Vertical offset for script modes, as a fraction of the scaled cell
/// height; negative is up.
fn script_shift(script: ScriptMode, cell_height: f32) -> f32 {
    match script {
        ScriptMode::Normal | ScriptMode::Sub => 0.0,
        ScriptMode::Mid => -0.25 * cell_height,
        ScriptMode::Super => -0.5 * cell_height,
    }
}

/// Reposition finished lines inside the bounding box. Never re-wraps.
fn align_lines(lines: &mut [Line], params: &LayoutParams) {
    let content_width = lines.iter().map(|l| l.width).fold(0.0f32, f32::max);
    let box_width = if params.target_width.is_finite() {
        params.target_width
    } else {
        content_width
    };
    let content_height = lines.last().map(|l| l.bottom_y()).unwrap_or(0.0);
    let box_height = params.target_height.unwrap_or(content_height);

    let dy = match params.align.v {
        VAlign::Top => 0.0,
        VAlign::Middle => (box_height - content_height) * 0.5,
        VAlign::Bottom => box_height - content_height,
    };

    for line in lines.iter_mut() {
        let dx = match params.align.h {
            HAlign::Left => 0.0,
            HAlign::Center => (box_width - line.width) * 0.5,
            HAlign::Right => box_width - line.width,
        };
        line.x_offset = dx;
        line.y_offset += dy;
        for glyph in &mut line.glyphs {
            glyph.x += dx;
            glyph.y += dy;
        }
    }
}
