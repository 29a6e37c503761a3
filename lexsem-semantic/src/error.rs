use lexsem_syntax::SyntaxError;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("no syntax tree to analyze")]
    MissingTree,
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
}
