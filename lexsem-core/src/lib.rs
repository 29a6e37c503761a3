pub mod diagnostics;
pub mod format;
pub mod location;
pub mod workspace;

pub use diagnostics::Finding;
pub use format::TableFormat;
pub use location::{LineIndex, Location, Position};
