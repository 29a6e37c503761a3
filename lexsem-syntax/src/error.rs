use lexsem_core::LineIndex;
use thiserror::Error;

pub type Result<T, E = SyntaxError> = std::result::Result<T, E>;

/// A source file that does not parse. `line` is 1-based, `column` is the
/// 1-based character offset of the offending token and `text` holds the
/// whole source line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (line {line}, column {column})")]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub text: String,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, column: usize, text: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            text: text.into(),
            message: message.into(),
        }
    }

    pub(crate) fn from_lexer(error: lexsem_token::Error, content: &str, line_index: &LineIndex) -> Self {
        let line = error.line().unwrap_or(1);
        let message = match error {
            lexsem_token::Error::InconsistentDedent { .. } => {
                "unindent does not match any outer indentation level"
            }
            lexsem_token::Error::UnterminatedString { .. } => "unterminated triple-quoted string literal",
            lexsem_token::Error::UnclosedBracket { .. } => "unclosed bracket",
            _ => "invalid syntax",
        };
        Self::new(line, 1, line_index.line_text(content, line), message)
    }
}
