//! Index-addressed font storage.
//!
//! Font families are mutable shared graphs that may include self-references
//! (font A's family containing font A). Storing fonts in an arena and
//! addressing them by index sidesteps ownership cycles entirely; `FontId`
//! is a plain copyable handle.

use crate::font::font::Font;
use crate::font::glyph::Glyph;

/// Handle to a font stored in a [`FontArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(pub usize);

/// A glyph resolved through the fallback chain, together with the font
/// that actually supplied it (scaled metrics must come from the supplier,
/// not the font the lookup started at).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedGlyph {
    pub glyph: Glyph,
    pub font: FontId,
    /// True when the placeholder stood in for a genuinely missing glyph.
    pub is_placeholder: bool,
}

/// Owns every font in play; layouts and labels hold `FontId`s only.
#[derive(Debug, Default)]
pub struct FontArena {
    fonts: Vec<Font>,
}

impl FontArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a font, returning its handle.
    pub fn insert(&mut self, font: Font) -> FontId {
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        id
    }

    pub fn get(&self, id: FontId) -> Option<&Font> {
        self.fonts.get(id.0)
    }

    pub fn get_mut(&mut self, id: FontId) -> Option<&mut Font> {
        self.fonts.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Resolve a code point: the starting font first, then its family in
    /// order, else the starting font's missing-glyph placeholder. Never
    /// fails; an empty arena yields a degenerate zero-metric placeholder.
    pub fn resolve(&self, start: FontId, cp: char) -> ResolvedGlyph {
        if let Some(font) = self.get(start) {
            if let Some(glyph) = font.glyph(cp) {
                return ResolvedGlyph {
                    glyph: *glyph,
                    font: start,
                    is_placeholder: false,
                };
            }
            for &member in font.family() {
                if member == start {
                    continue;
                }
                if let Some(sibling) = self.get(member) {
                    if let Some(glyph) = sibling.glyph(cp) {
                        return ResolvedGlyph {
                            glyph: *glyph,
                            font: member,
                            is_placeholder: false,
                        };
                    }
                }
            }
            return ResolvedGlyph {
                glyph: *font.missing_glyph(),
                font: start,
                is_placeholder: true,
            };
        }
        ResolvedGlyph {
            glyph: Glyph::new(
                crate::font::glyph::GlyphMetrics::spacer(0.0),
                crate::font::glyph::RegionHandle::PLACEHOLDER,
            ),
            font: start,
            is_placeholder: true,
        }
    }

    /// Resolve a named inline image: the starting font first, then its
    /// family, else the placeholder.
    pub fn resolve_image(&self, start: FontId, name: &str) -> ResolvedGlyph {
        if let Some(font) = self.get(start) {
            if let Some(glyph) = font.image(name) {
                return ResolvedGlyph {
                    glyph: *glyph,
                    font: start,
                    is_placeholder: false,
                };
            }
            for &member in font.family() {
                if member == start {
                    continue;
                }
                if let Some(sibling) = self.get(member) {
                    if let Some(glyph) = sibling.image(name) {
                        return ResolvedGlyph {
                            glyph: *glyph,
                            font: member,
                            is_placeholder: false,
                        };
                    }
                }
            }
            return ResolvedGlyph {
                glyph: *font.missing_glyph(),
                font: start,
                is_placeholder: true,
            };
        }
        self.resolve(start, '\u{FFFD}')
    }

    /// Find a family member of `start` by name, for `[@Name]` switches.
    pub fn family_by_name(&self, start: FontId, name: &str) -> Option<FontId> {
        self.get(start)?.family_member(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::glyph::{GlyphMetrics, RegionHandle};
    use crate::font::metrics::FontMetrics;

    fn test_font() -> Font {
        Font::new(FontMetrics {
            ascent: 8.0,
            descent: 2.0,
            line_gap: 0.0,
            cell_width: 6.0,
            cell_height: 10.0,
        })
        .unwrap()
    }

    #[test]
    fn resolve_prefers_local_glyph() {
        let mut arena = FontArena::new();
        let mut font = test_font();
        font.register_glyph('a', GlyphMetrics::spacer(6.0), RegionHandle(1));
        let id = arena.insert(font);

        let resolved = arena.resolve(id, 'a');
        assert!(!resolved.is_placeholder);
        assert_eq!(resolved.font, id);
    }

    #[test]
    fn resolve_walks_family_in_order() {
        let mut arena = FontArena::new();
        let main = arena.insert(test_font());
        let mut emoji = test_font();
        emoji.register_glyph('☺', GlyphMetrics::spacer(10.0), RegionHandle(7));
        let emoji_id = arena.insert(emoji);

        arena
            .get_mut(main)
            .unwrap()
            .set_family(vec!["Main".into(), "Emoji".into()], vec![main, emoji_id])
            .unwrap();

        let resolved = arena.resolve(main, '☺');
        assert!(!resolved.is_placeholder);
        assert_eq!(resolved.font, emoji_id);
        assert_eq!(resolved.glyph.region, RegionHandle(7));
    }

    #[test]
    fn resolve_self_referencing_family_terminates() {
        let mut arena = FontArena::new();
        let id = arena.insert(test_font());
        arena
            .get_mut(id)
            .unwrap()
            .set_family(vec!["Self".into()], vec![id])
            .unwrap();

        let resolved = arena.resolve(id, 'x');
        assert!(resolved.is_placeholder);
        assert_eq!(resolved.glyph.region, RegionHandle::PLACEHOLDER);
    }

    #[test]
    fn resolve_missing_yields_placeholder_never_fails() {
        let mut arena = FontArena::new();
        let id = arena.insert(test_font());
        let resolved = arena.resolve(id, 'z');
        assert!(resolved.is_placeholder);
        // Placeholder fills the nominal cell.
        assert_eq!(resolved.glyph.metrics.x_advance, 6.0);
    }

    #[test]
    fn resolve_image_falls_back_to_placeholder() {
        let mut arena = FontArena::new();
        let mut font = test_font();
        font.register_image("heart", GlyphMetrics::spacer(10.0), RegionHandle(3));
        let id = arena.insert(font);

        assert!(!arena.resolve_image(id, "heart").is_placeholder);
        assert!(arena.resolve_image(id, "missing").is_placeholder);
    }
}
