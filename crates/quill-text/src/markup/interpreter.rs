//! Token stream → styled glyph buffer.
//!
//! The interpreter maintains one stack per scoped attribute category
//! (color, scale, family) plus toggle state for booleans, resolves named
//! colors and variables, and emits [`StyledGlyph`]s. Timing/animation
//! tokens don't produce glyphs; they become [`AnchoredToken`]s keyed by the
//! glyph index they precede, for the reveal machine to consume.
//!
//! Interpretation never fails on malformed input. Unknown tags re-emit
//! their raw spelling as literal text, unresolved image names degrade to
//! the placeholder glyph, and invalid numeric arguments leave the previous
//! value in place. The worst case is visibly-wrong output.

use crate::font::{FontArena, FontId};
use crate::layout::styled::{GlyphKind, StyledGlyph};
use crate::markup::color::{ColorTable, Rgba};
use crate::markup::style::{CaseMode, ScriptMode, StyleStacks, StyleState};
use crate::markup::token::{Token, TokenKind};
use crate::markup::vars::VariableTable;
use crate::reveal::easing::EasingFunction;

/// A timing/animation token anchored at the glyph index it precedes.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchoredToken {
    /// Index into the flattened styled-glyph sequence.
    pub index: usize,
    pub kind: AnchoredTokenKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnchoredTokenKind {
    /// `{WAIT=s}` — hold the reveal cursor for `s` seconds.
    Wait(f32),
    /// `{SPEED=m}` — playback speed multiplier from this point on.
    Speed(f32),
    /// `{EVENT=name}` — queued for the host when the index is revealed.
    Event(String),
    /// `{EASE=name}` — pacing curve for subsequent glyph pop-in.
    Ease(EasingFunction),
}

/// Interpreter output: the styled glyph buffer plus the anchored
/// timing/animation tokens, both in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterpretOutput {
    pub glyphs: Vec<StyledGlyph>,
    pub tokens: Vec<AnchoredToken>,
}

/// An open `{GRADIENT=a;b}` span awaiting `{ENDGRADIENT}`.
struct OpenGradient {
    start: usize,
    from: Rgba,
    to: Rgba,
}

/// Interpret a token stream against a base style.
///
/// `font` is the label's primary font; the arena is consulted to resolve
/// `[@Name]` family switches to slot indices.
pub fn interpret(
    tokens: &[Token],
    base: &StyleState,
    fonts: &FontArena,
    font: FontId,
    colors: &ColorTable,
    vars: &VariableTable,
) -> InterpretOutput {
    let mut out = InterpretOutput::default();
    let mut current = base.clone();
    let mut stacks = StyleStacks::new();
    let mut gradient: Option<OpenGradient> = None;
    // True when the previous emitted character continues a word, for the
    // capitalize case transform.
    let mut in_word = false;

    for token in tokens {
        match &token.kind {
            TokenKind::Text(run) => {
                emit_text(&mut out, run, token.span.start, &current, &mut in_word);
            }
            TokenKind::Square { body, .. } => {
                let handled = apply_square_tag(
                    body,
                    &mut current,
                    &mut stacks,
                    base,
                    fonts,
                    font,
                    colors,
                    &mut out,
                    token.span.start,
                );
                if !handled {
                    let raw = token.raw_text();
                    log::debug!("unrecognized tag {raw:?}, emitting verbatim");
                    emit_text(&mut out, raw, token.span.start, &current, &mut in_word);
                }
            }
            TokenKind::Curly { name, arg, .. } => {
                let handled = apply_curly_token(
                    name,
                    arg.as_deref(),
                    &mut current,
                    &mut stacks,
                    base,
                    colors,
                    vars,
                    &mut gradient,
                    &mut out,
                    token.span.start,
                    &mut in_word,
                );
                if !handled {
                    let raw = token.raw_text();
                    log::debug!("unrecognized token {raw:?}, emitting verbatim");
                    emit_text(&mut out, raw, token.span.start, &current, &mut in_word);
                }
            }
        }
    }

    // An unterminated gradient still colors through to the end.
    if let Some(open) = gradient.take() {
        apply_gradient(&mut out.glyphs, open);
    }

    out
}

/// Emit a literal run, applying the active case transform.
fn emit_text(
    out: &mut InterpretOutput,
    run: &str,
    source_base: usize,
    style: &StyleState,
    in_word: &mut bool,
) {
    for (offset, ch) in run.char_indices() {
        let source = source_base + offset;
        match style.case {
            CaseMode::Normal => emit_char(out, ch, style, source),
            CaseMode::Upper => {
                for up in ch.to_uppercase() {
                    emit_char(out, up, style, source);
                }
            }
            CaseMode::Lower => {
                for low in ch.to_lowercase() {
                    emit_char(out, low, style, source);
                }
            }
            CaseMode::Capitalize => {
                if ch.is_alphanumeric() && !*in_word {
                    for up in ch.to_uppercase() {
                        emit_char(out, up, style, source);
                    }
                } else {
                    emit_char(out, ch, style, source);
                }
            }
        }
        *in_word = ch.is_alphanumeric();
    }
}

fn emit_char(out: &mut InterpretOutput, ch: char, style: &StyleState, source: usize) {
    out.glyphs
        .push(StyledGlyph::new(GlyphKind::Char(ch), style.clone(), source));
}

/// Apply a square-bracket tag. Returns false when the tag is unrecognized
/// and should degrade to literal text.
#[allow(clippy::too_many_arguments)]
fn apply_square_tag(
    body: &str,
    current: &mut StyleState,
    stacks: &mut StyleStacks,
    base: &StyleState,
    fonts: &FontArena,
    font: FontId,
    colors: &ColorTable,
    out: &mut InterpretOutput,
    source: usize,
) -> bool {
    match body {
        // Empty tag closes the most specific open color.
        "" => {
            stacks.color.pop();
            current.color = stacks.color.last().copied().unwrap_or(base.color);
            return true;
        }
        "*" => {
            current.bold = !current.bold;
            return true;
        }
        "/" => {
            current.italic = !current.italic;
            return true;
        }
        "_" => {
            current.underline = !current.underline;
            return true;
        }
        "~" => {
            current.strike = !current.strike;
            return true;
        }
        "." => {
            current.script = toggle_script(current.script, ScriptMode::Sub);
            return true;
        }
        "=" => {
            current.script = toggle_script(current.script, ScriptMode::Mid);
            return true;
        }
        "^" => {
            current.script = toggle_script(current.script, ScriptMode::Super);
            return true;
        }
        ";" => {
            current.case = toggle_case(current.case, CaseMode::Capitalize);
            return true;
        }
        "," => {
            current.case = toggle_case(current.case, CaseMode::Lower);
            return true;
        }
        "!" => {
            current.case = toggle_case(current.case, CaseMode::Upper);
            return true;
        }
        "%" => {
            stacks.scale.pop();
            current.scale = stacks.scale.last().copied().unwrap_or(base.scale);
            return true;
        }
        "@" => {
            stacks.family.pop();
            current.family = stacks.family.last().copied().unwrap_or(base.family);
            return true;
        }
        _ => {}
    }

    if let Some(hex) = body.strip_prefix('#') {
        match Rgba::from_hex(hex) {
            Some(color) => {
                stacks.color.push(color);
                current.color = color;
                return true;
            }
            None => {
                log::warn!("invalid hex color [#{hex}]");
                return false;
            }
        }
    }

    if let Some(percent) = body.strip_prefix('%') {
        match percent.parse::<f32>() {
            // Clamp so malformed markup can't produce zero/negative glyphs.
            Ok(value) => {
                let scale = (value / 100.0).max(0.1);
                stacks.scale.push(scale);
                current.scale = scale;
            }
            Err(_) => log::warn!("ignoring non-numeric scale [%{percent}]"),
        }
        return true;
    }

    if let Some(name) = body.strip_prefix('@') {
        match fonts.get(font).and_then(|f| f.family_slot_index(name)) {
            Some(slot) => {
                stacks.family.push(slot);
                current.family = slot;
            }
            None => log::warn!("unknown font family [@{name}], keeping current"),
        }
        return true;
    }

    if let Some(name) = body.strip_prefix('+') {
        out.glyphs.push(StyledGlyph::new(
            GlyphKind::Image(name.to_string()),
            current.clone(),
            source,
        ));
        return true;
    }

    // A bare name is a color lookup ("RED", "dark purple blue", ...).
    if let Some(color) = colors.get(body) {
        stacks.color.push(color);
        current.color = color;
        return true;
    }

    false
}

/// Apply a curly-brace token. Returns false when unrecognized.
#[allow(clippy::too_many_arguments)]
fn apply_curly_token(
    name: &str,
    arg: Option<&str>,
    current: &mut StyleState,
    stacks: &mut StyleStacks,
    base: &StyleState,
    colors: &ColorTable,
    vars: &VariableTable,
    gradient: &mut Option<OpenGradient>,
    out: &mut InterpretOutput,
    source: usize,
    in_word: &mut bool,
) -> bool {
    let anchor = out.glyphs.len();
    match name.to_ascii_uppercase().as_str() {
        "WAIT" => {
            match arg.and_then(|a| a.parse::<f32>().ok()) {
                Some(seconds) if seconds >= 0.0 => out.tokens.push(AnchoredToken {
                    index: anchor,
                    kind: AnchoredTokenKind::Wait(seconds),
                }),
                _ => log::warn!("ignoring WAIT with invalid argument {arg:?}"),
            }
            true
        }
        "SPEED" => {
            match arg.and_then(|a| a.parse::<f32>().ok()) {
                Some(mult) if mult > 0.0 => out.tokens.push(AnchoredToken {
                    index: anchor,
                    kind: AnchoredTokenKind::Speed(mult),
                }),
                _ => log::warn!("ignoring SPEED with invalid argument {arg:?}"),
            }
            true
        }
        "EVENT" => {
            match arg {
                Some(event) if !event.is_empty() => out.tokens.push(AnchoredToken {
                    index: anchor,
                    kind: AnchoredTokenKind::Event(event.to_string()),
                }),
                _ => log::warn!("ignoring EVENT without a name"),
            }
            true
        }
        "EASE" => {
            match arg.and_then(EasingFunction::from_name) {
                Some(ease) => out.tokens.push(AnchoredToken {
                    index: anchor,
                    kind: AnchoredTokenKind::Ease(ease),
                }),
                None => log::warn!("ignoring EASE with unknown curve {arg:?}"),
            }
            true
        }
        "VAR" => {
            if let Some(value) = arg.and_then(|name| vars.get(name)) {
                // Substituted text is literal; variables cannot inject tags.
                let value = value.to_string();
                emit_text(out, &value, source, current, in_word);
            }
            // Unresolved variables render as empty string.
            true
        }
        "COLOR" => {
            match arg.and_then(|a| resolve_color(a, colors)) {
                Some(color) => {
                    stacks.color.push(color);
                    current.color = color;
                }
                None => log::warn!("ignoring COLOR with unresolved argument {arg:?}"),
            }
            true
        }
        "CLEARCOLOR" => {
            stacks.color.clear();
            current.color = base.color;
            true
        }
        "GRADIENT" => {
            let parsed = arg.and_then(|a| {
                let (from, to) = a.split_once(';')?;
                Some((resolve_color(from, colors)?, resolve_color(to, colors)?))
            });
            match parsed {
                Some((from, to)) => {
                    // A new gradient closes any previous open one.
                    if let Some(open) = gradient.take() {
                        apply_gradient(&mut out.glyphs, open);
                    }
                    *gradient = Some(OpenGradient {
                        start: anchor,
                        from,
                        to,
                    });
                }
                None => log::warn!("ignoring GRADIENT with unparseable colors {arg:?}"),
            }
            true
        }
        "ENDGRADIENT" => {
            if let Some(open) = gradient.take() {
                apply_gradient(&mut out.glyphs, open);
            }
            true
        }
        "RESET" => {
            stacks.clear();
            *current = base.clone();
            true
        }
        _ => false,
    }
}

/// Hex or named color, for curly-token arguments.
fn resolve_color(arg: &str, colors: &ColorTable) -> Option<Rgba> {
    if arg.starts_with('#') || arg.chars().all(|c| c.is_ascii_hexdigit()) {
        if let Some(color) = Rgba::from_hex(arg) {
            return Some(color);
        }
    }
    colors.get(arg)
}

fn apply_gradient(glyphs: &mut [StyledGlyph], open: OpenGradient) {
    let span = &mut glyphs[open.start..];
    let len = span.len();
    if len == 0 {
        return;
    }
    let denom = (len - 1).max(1) as f32;
    for (i, glyph) in span.iter_mut().enumerate() {
        glyph.style.color = open.from.lerp(open.to, i as f32 / denom);
    }
}

fn toggle_script(active: ScriptMode, tag: ScriptMode) -> ScriptMode {
    if active == tag {
        ScriptMode::Normal
    } else {
        tag
    }
}

fn toggle_case(active: CaseMode, tag: CaseMode) -> CaseMode {
    if active == tag { CaseMode::Normal } else { tag }
}
