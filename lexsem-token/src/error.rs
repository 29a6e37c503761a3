use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unindent does not match any outer indentation level (line {line})")]
    InconsistentDedent { line: usize },
    #[error("EOF in multi-line string starting at line {line}")]
    UnterminatedString { line: usize },
    #[error("EOF in multi-line statement (line {line})")]
    UnclosedBracket { line: usize },
    #[error("invalid pattern for rule {name}: {message}")]
    InvalidPattern { name: String, message: String },
    #[error("rule {name} does not match its own example {example:?}")]
    InvalidExample { name: String, example: String },
    #[error("rule {name} is declared twice")]
    DuplicateRule { name: String },
    #[error("rule {earlier} must be tried before rule {later}")]
    MisorderedRule { earlier: String, later: String },
}

impl Error {
    /// Line the error refers to, for errors raised while tokenizing.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::InconsistentDedent { line }
            | Error::UnterminatedString { line }
            | Error::UnclosedBracket { line } => Some(*line),
            _ => None,
        }
    }
}
