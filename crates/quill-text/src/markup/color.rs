//! Packed RGBA colors, hex parsing, and the named-color vocabulary.
//!
//! Gradient interpolation converts through linear light so mid-gradient
//! glyphs don't go muddy the way naive sRGB lerps do.

use hashbrown::HashMap;
use palette::{FromColor, LinSrgba, Mix, Srgba};

/// Packed sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Pack as 0xRRGGBBAA.
    pub fn packed(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    pub fn from_packed(value: u32) -> Self {
        let [r, g, b, a] = value.to_be_bytes();
        Self { r, g, b, a }
    }

    /// Parse `RRGGBB` or `RRGGBBAA` hex, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = match hex.len() {
            6 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                [(v >> 16) as u8, (v >> 8) as u8, v as u8, 255]
            }
            8 => u32::from_str_radix(hex, 16).ok()?.to_be_bytes(),
            _ => return None,
        };
        Some(Self::new(bytes[0], bytes[1], bytes[2], bytes[3]))
    }

    /// Interpolate toward `other` in linear space, `t` in 0..=1.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let a = LinSrgba::from_color(Srgba::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ));
        let b = LinSrgba::from_color(Srgba::new(
            other.r as f32 / 255.0,
            other.g as f32 / 255.0,
            other.b as f32 / 255.0,
            other.a as f32 / 255.0,
        ));
        let mixed: Srgba = Srgba::from_color(a.mix(b, t.clamp(0.0, 1.0)));
        Rgba::new(
            (mixed.red * 255.0).round().clamp(0.0, 255.0) as u8,
            (mixed.green * 255.0).round().clamp(0.0, 255.0) as u8,
            (mixed.blue * 255.0).round().clamp(0.0, 255.0) as u8,
            (mixed.alpha * 255.0).round().clamp(0.0, 255.0) as u8,
        )
    }
}

/// Case-insensitive named-color lookup, including multi-word descriptive
/// aliases ("dark purple blue"). The built-in set is a starting vocabulary;
/// hosts extend it from configuration rather than recompiling.
#[derive(Debug, Clone)]
pub struct ColorTable {
    entries: HashMap<String, Rgba>,
}

impl Default for ColorTable {
    fn default() -> Self {
        let mut table = Self {
            entries: HashMap::new(),
        };
        for (name, value) in BUILTIN_COLORS {
            table.entries.insert((*name).to_string(), *value);
        }
        table
    }
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a named color. Names are normalized to
    /// lowercase with single spaces between words.
    pub fn insert(&mut self, name: &str, color: Rgba) {
        self.entries.insert(normalize(name), color);
    }

    /// Case-insensitive lookup; multi-word names collapse whitespace.
    pub fn get(&self, name: &str) -> Option<Rgba> {
        self.entries.get(&normalize(name)).copied()
    }

    /// Merge hex-string entries (e.g. from `quill-config`'s
    /// `[markup.colors]` section), skipping unparseable values.
    pub fn extend_from_hex<'a>(&mut self, entries: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (name, hex) in entries {
            match Rgba::from_hex(hex) {
                Some(color) => self.insert(name, color),
                None => log::warn!("ignoring unparseable color {name:?} = {hex:?}"),
            }
        }
    }
}

fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

const BUILTIN_COLORS: &[(&str, Rgba)] = &[
    ("black", Rgba::rgb(0x00, 0x00, 0x00)),
    ("white", Rgba::rgb(0xFF, 0xFF, 0xFF)),
    ("gray", Rgba::rgb(0x7F, 0x7F, 0x7F)),
    ("grey", Rgba::rgb(0x7F, 0x7F, 0x7F)),
    ("light gray", Rgba::rgb(0xBF, 0xBF, 0xBF)),
    ("dark gray", Rgba::rgb(0x3F, 0x3F, 0x3F)),
    ("red", Rgba::rgb(0xFF, 0x00, 0x00)),
    ("green", Rgba::rgb(0x00, 0xFF, 0x00)),
    ("blue", Rgba::rgb(0x00, 0x00, 0xFF)),
    ("yellow", Rgba::rgb(0xFF, 0xFF, 0x00)),
    ("orange", Rgba::rgb(0xFF, 0xA5, 0x00)),
    ("pink", Rgba::rgb(0xFF, 0x69, 0xB4)),
    ("magenta", Rgba::rgb(0xFF, 0x00, 0xFF)),
    ("cyan", Rgba::rgb(0x00, 0xFF, 0xFF)),
    ("purple", Rgba::rgb(0x80, 0x00, 0x80)),
    ("violet", Rgba::rgb(0xEE, 0x82, 0xEE)),
    ("brown", Rgba::rgb(0x8B, 0x45, 0x13)),
    ("navy", Rgba::rgb(0x00, 0x00, 0x80)),
    ("teal", Rgba::rgb(0x00, 0x80, 0x80)),
    ("olive", Rgba::rgb(0x80, 0x80, 0x00)),
    ("maroon", Rgba::rgb(0x80, 0x00, 0x00)),
    ("gold", Rgba::rgb(0xFF, 0xD7, 0x00)),
    ("silver", Rgba::rgb(0xC0, 0xC0, 0xC0)),
    ("sky blue", Rgba::rgb(0x87, 0xCE, 0xEB)),
    ("dark purple blue", Rgba::rgb(0x2E, 0x1A, 0x8B)),
    ("light pink orange", Rgba::rgb(0xFF, 0xB0, 0x8A)),
    ("dark green", Rgba::rgb(0x00, 0x64, 0x00)),
    ("light blue", Rgba::rgb(0xAD, 0xD8, 0xE6)),
    ("dark red", Rgba::rgb(0x8B, 0x00, 0x00)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parse_rgb_and_rgba() {
        assert_eq!(Rgba::from_hex("FF0000"), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(
            Rgba::from_hex("#00FF0080"),
            Some(Rgba::new(0, 255, 0, 0x80))
        );
        assert_eq!(Rgba::from_hex("xyz"), None);
        assert_eq!(Rgba::from_hex("FFF"), None);
    }

    #[test]
    fn packed_round_trip() {
        let c = Rgba::new(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.packed(), 0x12345678);
        assert_eq!(Rgba::from_packed(c.packed()), c);
    }

    #[test]
    fn lerp_endpoints_are_exact() {
        let a = Rgba::rgb(255, 0, 0);
        let b = Rgba::rgb(0, 0, 255);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn lerp_midpoint_is_brighter_than_srgb_average() {
        // Linear-light mixing keeps the midpoint above the naive sRGB
        // average of 127.
        let mid = Rgba::rgb(255, 0, 0).lerp(Rgba::rgb(0, 0, 255), 0.5);
        assert!(mid.r > 127);
        assert!(mid.b > 127);
    }

    #[test]
    fn named_lookup_is_case_insensitive() {
        let table = ColorTable::new();
        assert_eq!(table.get("RED"), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(table.get("Dark  Purple Blue"), table.get("dark purple blue"));
        assert_eq!(table.get("no such color"), None);
    }

    #[test]
    fn config_extension_overrides_builtins() {
        let mut table = ColorTable::new();
        table.extend_from_hex([("red", "00FF00"), ("bogus", "not-hex")]);
        assert_eq!(table.get("red"), Some(Rgba::rgb(0, 255, 0)));
        assert_eq!(table.get("bogus"), None);
    }
}
