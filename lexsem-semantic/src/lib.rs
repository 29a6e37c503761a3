pub mod analyzer;
pub mod builtins;
pub mod diagnostics;
pub mod error;
pub mod passes;


pub use analyzer::{SemanticAnalyzer, SemanticReport};
pub use builtins::{Builtins, PYTHON_312_BUILTINS};
pub use error::{Error, Result};
pub use passes::*;
