pub mod check;
pub mod graph;
pub mod init;
pub mod tokens;
pub mod tree;
