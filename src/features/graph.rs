use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use lexsem_report::{DotGraph, flow_graph, semantic_graph, syntax_graph};
use lexsem_syntax::Module;
use tracing::info;

use crate::core::source_manager::SourceManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphKind {
    /// Every syntax node
    Syntax,
    /// Statements nested under the blocks that own them
    Semantic,
    /// Simplified control flow
    Flow,
}

impl GraphKind {
    fn as_str(self) -> &'static str {
        match self {
            GraphKind::Syntax => "syntax",
            GraphKind::Semantic => "semantic",
            GraphKind::Flow => "flow",
        }
    }

    fn build(self, module: &Module) -> DotGraph {
        match self {
            GraphKind::Syntax => syntax_graph(module),
            GraphKind::Semantic => semantic_graph(module),
            GraphKind::Flow => flow_graph(module),
        }
    }
}

fn default_output(output_dir: &Path, file: &Path, kind: GraphKind) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_else(|| "source".into());
    output_dir.join(format!("{stem}_{}.dot", kind.as_str()))
}

pub fn run(sources: &SourceManager, file: &Path, kind: GraphKind, output: Option<&Path>) -> Result<bool> {
    let source = sources.read(file)?;
    let module = match source.parse() {
        Ok(module) => module,
        Err(error) => {
            eprintln!("{}", source.describe_syntax_error(&error));
            return Ok(false);
        }
    };

    let output = match output {
        Some(output) => output.to_path_buf(),
        None => default_output(&sources.config().output_dir, file, kind),
    };
    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("could not create {}", parent.display()))?;
    }

    let graph = kind.build(&module);
    std::fs::write(&output, graph.render())
        .with_context(|| format!("could not write {}", output.display()))?;
    info!(nodes = graph.nodes().len(), path = %output.display(), "wrote graph");
    println!("Graph written to {}", output.display());

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output() {
        let output = default_output(Path::new("images"), Path::new("src/main.py"), GraphKind::Semantic);
        assert_eq!(output, PathBuf::from("images/main_semantic.dot"));
    }
}
