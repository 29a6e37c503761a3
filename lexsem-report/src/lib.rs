pub mod compact;
pub mod dot;
pub mod error;
pub mod graph;
pub mod semantic;
pub mod table;
pub mod tree;


pub use compact::{compact_listing, python_repr};
pub use dot::{DotGraph, DotWriter};
pub use error::{Error, Result};
pub use graph::{flow_graph, semantic_graph, syntax_graph};
pub use semantic::{render_report, render_report_json};
pub use table::{TokenRow, render_table, token_rows};
pub use tree::semantic_tree;
