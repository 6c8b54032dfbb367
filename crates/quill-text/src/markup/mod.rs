pub mod color;
pub mod interpreter;
pub mod style;
pub mod token;
pub mod tokenizer;
pub mod vars;

pub use color::{ColorTable, Rgba};
pub use interpreter::{AnchoredToken, AnchoredTokenKind, InterpretOutput, interpret};
pub use style::{CaseMode, ScriptMode, StyleStacks, StyleState};
pub use token::{Token, TokenKind};
pub use tokenizer::{MarkupOptions, tokenize};
pub use vars::VariableTable;
