mod control_flow;
mod scope;
mod types;
mod uncalled;
mod unused;

pub use control_flow::find_empty_control_blocks;
pub use scope::find_scope_violations;
pub use types::find_type_errors;
pub use uncalled::find_uncalled_functions;
pub use unused::find_unused_assignments;
