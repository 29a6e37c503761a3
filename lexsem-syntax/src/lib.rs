pub mod ast;
pub mod error;
pub mod expressions;
pub mod fstring;
pub mod label;
pub mod literals;
pub mod node;
pub mod parser;

pub use ast::*;
pub use error::{Result, SyntaxError};
pub use label::label;
pub use node::{Node, Walk, walk_breadth_first};
pub use parser::{Parser, parse};
