//! Quill configuration system
//!
//! This crate provides centralized configuration management for Quill,
//! loading settings from `quill.toml` as an alternative to environment
//! variables. The markup vocabulary (extra named colors, delimiter toggles)
//! lives here so it can evolve without code changes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main configuration structure for Quill
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QuillConfig {
    /// Markup language settings
    pub markup: MarkupSection,
    /// Typewriter/reveal animation settings
    pub typing: TypingSection,
    /// Layout engine settings
    pub layout: LayoutSection,
}

/// Markup language configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupSection {
    /// Recognize square-bracket style tags (`[*]`, `[#FF0000]`, ...)
    pub square_tags: bool,
    /// Recognize curly-brace tokens (`{WAIT=1}`, `{EVENT=x}`, ...)
    pub curly_tags: bool,
    /// Extra named colors merged into the built-in table.
    /// Keys are case-insensitive names, values are `RRGGBB` or `RRGGBBAA` hex.
    pub colors: HashMap<String, String>,
}

/// Typewriter/reveal animation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingSection {
    /// Seconds between revealed glyphs at speed multiplier 1.0
    pub interval: f32,
    /// Upper bound on glyphs revealed by a single advance() call
    pub max_glyphs_per_tick: usize,
    /// When skipping to the end, fire only the terminal event instead of
    /// every intermediate `{EVENT=...}` token
    pub suppress_events_on_skip: bool,
}

/// Layout engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSection {
    /// Round final glyph positions to whole units (pixel-art fonts)
    pub integer_positions: bool,
    /// Extra spacing between stacked lines in pixels
    pub line_spacing: f32,
}

impl Default for MarkupSection {
    fn default() -> Self {
        Self {
            square_tags: true,
            curly_tags: true,
            colors: HashMap::new(),
        }
    }
}

impl Default for TypingSection {
    fn default() -> Self {
        Self {
            interval: 0.05,
            max_glyphs_per_tick: 32,
            suppress_events_on_skip: false,
        }
    }
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            integer_positions: false,
            line_spacing: 0.0,
        }
    }
}

impl QuillConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the quill.toml configuration file
    ///
    /// # Returns
    /// * `Ok(QuillConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if loading failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from the default location (quill.toml in the
    /// current directory) or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("quill.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// This allows for temporary overrides without modifying the config file.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("QUILL_SQUARE_TAGS") {
            self.markup.square_tags = truthy(&val);
        }
        if let Ok(val) = std::env::var("QUILL_CURLY_TAGS") {
            self.markup.curly_tags = truthy(&val);
        }
        if let Ok(val) = std::env::var("QUILL_TYPING_INTERVAL") {
            if let Ok(interval) = val.parse::<f32>() {
                self.typing.interval = interval;
            }
        }
        if let Ok(val) = std::env::var("QUILL_MAX_GLYPHS_PER_TICK") {
            if let Ok(cap) = val.parse::<usize>() {
                self.typing.max_glyphs_per_tick = cap;
            }
        }
        if let Ok(val) = std::env::var("QUILL_SUPPRESS_SKIP_EVENTS") {
            self.typing.suppress_events_on_skip = truthy(&val);
        }
        if let Ok(val) = std::env::var("QUILL_INTEGER_POSITIONS") {
            self.layout.integer_positions = truthy(&val);
        }
        if let Ok(val) = std::env::var("QUILL_LINE_SPACING") {
            if let Ok(spacing) = val.parse::<f32>() {
                self.layout.line_spacing = spacing;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// This is the recommended way to load configuration:
    /// 1. Load from quill.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

fn truthy(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuillConfig::default();
        assert!(config.markup.square_tags);
        assert!(config.markup.curly_tags);
        assert!(config.markup.colors.is_empty());
        assert!(config.typing.interval > 0.0);
        assert!(config.typing.max_glyphs_per_tick > 0);
        assert!(!config.layout.integer_positions);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            [markup]
            curly_tags = false

            [markup.colors]
            ochre = "CC7722"

            [typing]
            interval = 0.1
        "#;
        let config: QuillConfig = toml::from_str(toml_str).unwrap();
        assert!(config.markup.square_tags);
        assert!(!config.markup.curly_tags);
        assert_eq!(config.markup.colors.get("ochre").unwrap(), "CC7722");
        assert_eq!(config.typing.interval, 0.1);
        // Untouched sections keep their defaults.
        assert_eq!(config.typing.max_glyphs_per_tick, 32);
        assert_eq!(config.layout.line_spacing, 0.0);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let result = QuillConfig::load_from_file("/nonexistent/quill.toml");
        assert!(result.is_err());
    }
}
