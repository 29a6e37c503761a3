use std::path::Path;

use anyhow::Result;
use lexsem_report::semantic_tree;

use crate::core::source_manager::SourceManager;

pub fn run(sources: &SourceManager, file: &Path) -> Result<bool> {
    let file = sources.read(file)?;
    match file.parse() {
        Ok(module) => {
            println!("Simplified semantic tree of {}:", file.path.display());
            println!("{}", semantic_tree(&module));
            Ok(true)
        }
        Err(error) => {
            eprintln!("{}", file.describe_syntax_error(&error));
            Ok(false)
        }
    }
}
