//! Scanner for the inline markup language.
//!
//! Two bracket styles coexist in one pass: square tags (`[*]`, `[#FF0000]`)
//! for terse inline styling and curly tokens (`{WAIT=1}`, `{EVENT=x}`) for
//! the timing/animation vocabulary. Either style can be disabled, in which
//! case its delimiters pass through as ordinary literals.

use serde::{Deserialize, Serialize};

use crate::markup::token::{Token, TokenKind};

/// Tokenizer feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupOptions {
    /// Recognize square-bracket tags.
    pub square_tags: bool,
    /// Recognize curly-brace tokens.
    pub curly_tags: bool,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            square_tags: true,
            curly_tags: true,
        }
    }
}

impl From<&quill_config::MarkupSection> for MarkupOptions {
    fn from(section: &quill_config::MarkupSection) -> Self {
        Self {
            square_tags: section.square_tags,
            curly_tags: section.curly_tags,
        }
    }
}

/// Scan `text` into a flat token sequence.
///
/// Rules:
/// - `[[` / `{{` escape to one literal delimiter character.
/// - An unterminated tag degrades to literal text (never an error).
/// - Control characters and zero-width marks pass through as ordinary
///   literal code points; layout handles their metrics uniformly.
pub fn tokenize(text: &str, options: &MarkupOptions) -> Vec<Token> {
    let mut tokens = Vec::new();
    let bytes = text.as_bytes();
    let mut pos = 0usize;
    // Start of the literal run currently being accumulated.
    let mut run_start = 0usize;

    let flush_run = |tokens: &mut Vec<Token>, run_start: usize, end: usize, text: &str| {
        if run_start < end {
            tokens.push(Token::new(
                TokenKind::Text(text[run_start..end].to_string()),
                run_start..end,
            ));
        }
    };

    while pos < bytes.len() {
        let byte = bytes[pos];
        let (open, close, enabled) = match byte {
            b'[' => ('[', ']', options.square_tags),
            b'{' => ('{', '}', options.curly_tags),
            _ => {
                pos += next_char_len(text, pos);
                continue;
            }
        };

        if !enabled {
            pos += 1;
            continue;
        }

        // Doubled opening delimiter escapes to a single literal.
        if bytes.get(pos + 1) == Some(&(open as u8)) {
            flush_run(&mut tokens, run_start, pos, text);
            tokens.push(Token::new(
                TokenKind::Text(open.to_string()),
                pos..pos + 2,
            ));
            pos += 2;
            run_start = pos;
            continue;
        }

        // Find the matching close delimiter. Tags never nest.
        let Some(rel_end) = text[pos + 1..].find(close) else {
            // Unterminated: treat the delimiter as literal text.
            pos += 1;
            continue;
        };
        let body_start = pos + 1;
        let body_end = body_start + rel_end;
        let tag_end = body_end + 1;
        let body = &text[body_start..body_end];
        let raw = &text[pos..tag_end];

        flush_run(&mut tokens, run_start, pos, text);
        let kind = if open == '[' {
            TokenKind::Square {
                body: body.to_string(),
                raw: raw.to_string(),
            }
        } else {
            let (name, arg) = match body.split_once('=') {
                Some((name, arg)) => (name.to_string(), Some(arg.to_string())),
                None => (body.to_string(), None),
            };
            TokenKind::Curly {
                name,
                arg,
                raw: raw.to_string(),
            }
        };
        tokens.push(Token::new(kind, pos..tag_end));
        pos = tag_end;
        run_start = pos;
    }

    flush_run(&mut tokens, run_start, text.len(), text);
    tokens
}

fn next_char_len(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map_or(1, char::len_utf8)
}
