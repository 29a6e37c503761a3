use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use lexsem_config::Config;
use lexsem_core::workspace::search_for_sources;
use lexsem_semantic::{Builtins, SemanticAnalyzer};
use lexsem_syntax::{Module, SyntaxError};
use tracing::info;

#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

impl SourceFile {
    pub fn parse(&self) -> Result<Module, SyntaxError> {
        lexsem_syntax::parse(&self.content)
    }

    /// Multi-line description of a parse failure, shown instead of any
    /// analysis output.
    pub fn describe_syntax_error(&self, error: &SyntaxError) -> String {
        format!(
            "Syntax error in {}\nLine {}, column {}: {}\nDetails: {}",
            self.path.display(),
            error.line,
            error.column,
            error.text.trim(),
            error.message
        )
    }
}

/// Resolves and loads the files a command works on.
#[derive(Debug)]
pub struct SourceManager {
    config: Config,
}

impl SourceManager {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Every source file under `path`, or `path` itself when it is a file.
    pub fn collect(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.exists() {
            bail!("{} does not exist", path.display());
        }

        let sources = search_for_sources(path, &self.config.source_extension);
        if sources.is_empty() {
            bail!(
                "no .{} files found under {}",
                self.config.source_extension,
                path.display()
            );
        }

        Ok(sources)
    }

    pub fn read(&self, path: &Path) -> Result<SourceFile> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        info!(path = %path.display(), bytes = content.len(), "loaded source");

        Ok(SourceFile {
            path: path.to_path_buf(),
            content,
        })
    }

    pub fn analyzer(&self) -> SemanticAnalyzer {
        let builtins = Builtins::standard().with_extra(self.config.extra_builtins.iter().cloned());
        SemanticAnalyzer::new(builtins)
    }
}
