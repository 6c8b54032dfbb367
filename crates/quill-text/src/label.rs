//! The host-facing label surface.
//!
//! A [`Label`] owns one markup string and the pipeline state derived from
//! it. Setters mark the label dirty; [`Label::validate`] re-runs
//! tokenize → interpret → layout against a font arena and feeds the
//! resulting anchored tokens to the embedded [`RevealState`]. Malformed
//! markup never fails validation; bad tags degrade to literal text.

use quill_config::QuillConfig;

use crate::font::{FontArena, FontId};
use crate::layout::engine::{LayoutParams, layout};
use crate::layout::{Align, DrawCommand, Layout};
use crate::markup::color::{ColorTable, Rgba};
use crate::markup::interpreter::interpret;
use crate::markup::style::StyleState;
use crate::markup::tokenizer::{MarkupOptions, tokenize};
use crate::markup::vars::VariableTable;
use crate::reveal::events::RevealEvent;
use crate::reveal::machine::{RevealState, RevealStatus, TypingConfig};

#[derive(Debug, Clone)]
pub struct Label {
    markup: String,
    params: LayoutParams,
    base_style: StyleState,
    options: MarkupOptions,
    colors: ColorTable,
    vars: VariableTable,
    layout: Layout,
    typing: RevealState,
    dirty: bool,
}

impl Default for Label {
    fn default() -> Self {
        Self::new()
    }
}

impl Label {
    pub fn new() -> Self {
        Self {
            markup: String::new(),
            params: LayoutParams::default(),
            base_style: StyleState::default(),
            options: MarkupOptions::default(),
            colors: ColorTable::default(),
            vars: VariableTable::new(),
            layout: Layout::empty(),
            typing: RevealState::new(TypingConfig::default()),
            dirty: true,
        }
    }

    /// Build a label with config-driven markup vocabulary, typing pace and
    /// layout defaults.
    pub fn with_config(config: &QuillConfig) -> Self {
        let mut label = Self::new();
        label.options = MarkupOptions::from(&config.markup);
        label.colors.extend_from_hex(
            config
                .markup
                .colors
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        label.typing = RevealState::new(TypingConfig::from(&config.typing));
        label.params.integer_positions = config.layout.integer_positions;
        label.params.line_spacing = config.layout.line_spacing;
        label
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn set_markup(&mut self, markup: impl Into<String>) {
        let markup = markup.into();
        if markup != self.markup {
            self.markup = markup;
            self.dirty = true;
        }
    }

    /// Wrap/alignment width; `f32::INFINITY` removes the constraint.
    pub fn set_target_width(&mut self, width: f32) {
        self.params.target_width = width;
        self.dirty = true;
    }

    /// Bounding-box height for vertical alignment.
    pub fn set_target_height(&mut self, height: Option<f32>) {
        self.params.target_height = height;
        self.dirty = true;
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.params.wrap = wrap;
        self.dirty = true;
    }

    /// `0` means unlimited.
    pub fn set_max_lines(&mut self, max_lines: usize) {
        self.params.max_lines = max_lines;
        self.dirty = true;
    }

    pub fn set_ellipsis(&mut self, ellipsis: impl Into<String>) {
        self.params.ellipsis = ellipsis.into();
        self.dirty = true;
    }

    pub fn set_alignment(&mut self, align: Align) {
        self.params.align = align;
        self.dirty = true;
    }

    /// Base text color markup resets back to (`[]` on an empty stack,
    /// `{RESET}`).
    pub fn set_base_color(&mut self, color: Rgba) {
        self.base_style.color = color;
        self.dirty = true;
    }

    pub fn set_base_style(&mut self, style: StyleState) {
        self.base_style = style;
        self.dirty = true;
    }

    /// Substitution variables for `{VAR=name}`. Mutating marks the label
    /// dirty since substitutions land in the glyph buffer.
    pub fn variables_mut(&mut self) -> &mut VariableTable {
        self.dirty = true;
        &mut self.vars
    }

    /// Named colors for `[Name]` tags, on top of the built-in table.
    pub fn colors_mut(&mut self) -> &mut ColorTable {
        self.dirty = true;
        &mut self.colors
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Re-run the markup pipeline if anything changed since the last
    /// validation. The reveal keeps its playback state; its anchored
    /// tokens are replaced and its cursor clamps to the new layout.
    pub fn validate(&mut self, fonts: &FontArena, font: FontId) {
        if !self.dirty {
            return;
        }
        let tokens = tokenize(&self.markup, &self.options);
        let output = interpret(
            &tokens,
            &self.base_style,
            fonts,
            font,
            &self.colors,
            &self.vars,
        );
        self.layout = layout(&output.glyphs, fonts, font, &self.params);
        self.typing.retarget(output.tokens);
        self.dirty = false;
    }

    /// The most recently validated layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Content width of the validated layout.
    pub fn pref_width(&self) -> f32 {
        self.layout.width()
    }

    /// Content height of the validated layout.
    pub fn pref_height(&self) -> f32 {
        self.layout.height()
    }

    pub fn typing(&self) -> &RevealState {
        &self.typing
    }

    pub fn typing_mut(&mut self) -> &mut RevealState {
        &mut self.typing
    }

    /// Step the reveal against this label's own layout.
    pub fn advance(&mut self, dt: f32) {
        self.typing.advance(dt, &self.layout);
    }

    pub fn skip_to_end(&mut self) {
        self.typing.skip_to_end(&self.layout);
    }

    pub fn drain_events(&mut self) -> Vec<RevealEvent> {
        self.typing.drain_events().collect()
    }

    /// Draw commands for the current frame. An idle reveal draws the full
    /// text; a started reveal draws up to its cursor.
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        match self.typing.status() {
            RevealStatus::Idle => self.layout.draw_commands(None),
            _ => self
                .layout
                .draw_commands(Some(self.typing.revealed_count(&self.layout))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{Font, FontMetrics, GlyphMetrics, RegionHandle};

    fn test_arena() -> (FontArena, FontId) {
        let mut arena = FontArena::new();
        let mut font = Font::new(FontMetrics {
            ascent: 8.0,
            descent: 2.0,
            line_gap: 0.0,
            cell_width: 10.0,
            cell_height: 10.0,
        })
        .unwrap();
        for cp in ' '..='~' {
            font.register_glyph(
                cp,
                GlyphMetrics {
                    width: 10.0,
                    height: 10.0,
                    x_advance: 10.0,
                    x_offset: 0.0,
                    y_offset: 8.0,
                },
                RegionHandle(cp as u64),
            );
        }
        let id = arena.insert(font);
        (arena, id)
    }

    #[test]
    fn validate_clears_dirty_and_builds_layout() {
        let (arena, font) = test_arena();
        let mut label = Label::new();
        label.set_markup("hello");
        assert!(label.is_dirty());
        label.validate(&arena, font);
        assert!(!label.is_dirty());
        assert_eq!(label.layout().glyph_count(), 5);
        assert_eq!(label.pref_width(), 50.0);
    }

    #[test]
    fn setters_mark_dirty_and_revalidate() {
        let (arena, font) = test_arena();
        let mut label = Label::new();
        label.set_markup("aaa bbb");
        label.validate(&arena, font);
        let one_line = label.layout().lines().len();
        assert_eq!(one_line, 1);

        label.set_target_width(50.0);
        label.set_wrap(true);
        assert!(label.is_dirty());
        label.validate(&arena, font);
        assert_eq!(label.layout().lines().len(), 2);
    }

    #[test]
    fn unchanged_markup_does_not_dirty() {
        let (arena, font) = test_arena();
        let mut label = Label::new();
        label.set_markup("hi");
        label.validate(&arena, font);
        label.set_markup("hi");
        assert!(!label.is_dirty());
    }

    #[test]
    fn variables_flow_into_layout() {
        let (arena, font) = test_arena();
        let mut label = Label::new();
        label.set_markup("hi {VAR=name}");
        label.variables_mut().set("name", "bob");
        label.validate(&arena, font);
        assert_eq!(label.layout().glyph_count(), "hi bob".chars().count());
    }

    #[test]
    fn idle_label_draws_everything() {
        let (arena, font) = test_arena();
        let mut label = Label::new();
        label.set_markup("abc");
        label.validate(&arena, font);
        assert_eq!(label.draw_commands().len(), 3);
    }

    #[test]
    fn reveal_limits_draw_commands() {
        let (arena, font) = test_arena();
        let mut label = Label::new();
        label.set_markup("abcd");
        label.validate(&arena, font);
        label.typing_mut().restart();
        assert_eq!(label.draw_commands().len(), 0);
        label.advance(0.1); // default interval 0.05 -> two glyphs
        assert_eq!(label.draw_commands().len(), 2);
        label.skip_to_end();
        assert_eq!(label.draw_commands().len(), 4);
        assert!(label.drain_events().contains(&RevealEvent::Finished));
    }

    #[test]
    fn geometry_revalidate_does_not_replay_events() {
        let (arena, font) = test_arena();
        let mut label = Label::new();
        label.set_markup("a{EVENT=boom}bcdefgh");
        label.validate(&arena, font);
        label.typing_mut().restart();
        label.advance(0.2); // default interval 0.05 -> four glyphs
        let first = label.drain_events();
        assert!(first.contains(&RevealEvent::Named {
            name: "boom".into(),
            index: 1
        }));

        // Host resize between frames: the relayout must not requeue the
        // already-delivered event.
        label.set_target_width(1000.0);
        label.validate(&arena, font);
        label.advance(0.1);
        assert!(label.drain_events().is_empty());
    }

    #[test]
    fn config_shapes_vocabulary_and_typing() {
        let (arena, font) = test_arena();
        let mut config = QuillConfig::default();
        config.markup.curly_tags = false;
        config.typing.interval = 1.0;
        let mut label = Label::with_config(&config);
        label.set_markup("a{WAIT=5}b");
        label.validate(&arena, font);
        // Curly tokens disabled: braces are literal text.
        assert_eq!(label.layout().glyph_count(), "a{WAIT=5}b".chars().count());
        label.typing_mut().restart();
        label.advance(0.5);
        assert_eq!(label.typing().cursor(), 0);
    }

    #[test]
    fn malformed_markup_still_validates() {
        let (arena, font) = test_arena();
        let mut label = Label::new();
        label.set_markup("[unclosed {EVENT= [#GGG] done");
        label.validate(&arena, font);
        assert!(!label.is_dirty());
        assert!(label.layout().glyph_count() > 0);
    }
}
