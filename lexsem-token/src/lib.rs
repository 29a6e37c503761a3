pub mod classify;
pub mod error;
pub mod lexer;
pub mod rules;
pub mod token;

pub use classify::{ClassifiedToken, Classifier, KEYWORDS, describe};
pub use error::{Error, Result};
pub use lexer::{Lexer, primitive_tokens, tokenize};
pub use rules::{Rule, RuleSpec, RuleTable, STANDARD_RULES};
pub use token::*;
