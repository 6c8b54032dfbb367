use core::ops::Range;

/// One lexical unit of a markup string.
///
/// The tokenizer does not decide whether a tag is *meaningful* — the
/// vocabulary is swappable, so recognition happens in the interpreter and
/// unknown tags degrade to their raw spelling. Every tag token therefore
/// carries the original text it was scanned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of literal code points. Escape sequences (`[[`, `{{`) emit
    /// their own single-character run so source spans stay honest.
    Text(String),
    /// A square-bracket tag `[body]`. `body` may be empty (`[]` closes the
    /// most specific open attribute of its category).
    Square {
        body: String,
        /// Original spelling including delimiters, for degradation.
        raw: String,
    },
    /// A curly-brace token `{NAME}` or `{NAME=arg}`.
    Curly {
        name: String,
        arg: Option<String>,
        /// Original spelling including delimiters, for degradation.
        raw: String,
    },
}

/// A token plus the byte range it was scanned from, for mapping glyphs
/// back to source offsets (caret/selection).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, span: Range<usize>) -> Self {
        Self { kind, span }
    }

    /// The literal text this token degrades to when unrecognized.
    pub fn raw_text(&self) -> &str {
        match &self.kind {
            TokenKind::Text(s) => s,
            TokenKind::Square { raw, .. } => raw,
            TokenKind::Curly { raw, .. } => raw,
        }
    }
}
