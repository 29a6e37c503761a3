use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use lexsem_report::{render_report, render_report_json};
use tracing::{info, warn};

use crate::core::source_manager::SourceManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CheckFormat {
    Text,
    Json,
}

/// Returns `false` when any file failed to parse.
pub fn run(sources: &SourceManager, path: &Path, format: CheckFormat) -> Result<bool> {
    let analyzer = sources.analyzer();
    let mut ok = true;

    for path in sources.collect(path)? {
        let file = sources.read(&path)?;
        let module = match file.parse() {
            Ok(module) => module,
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping file that does not parse");
                eprintln!("{}", file.describe_syntax_error(&error));
                ok = false;
                continue;
            }
        };

        let report = analyzer.analyze_module(&module);
        info!(path = %path.display(), findings = report.finding_count(), "analyzed");

        match format {
            CheckFormat::Text => {
                println!("Semantic analysis of {}", path.display());
                println!("{}", render_report(&report));
            }
            CheckFormat::Json => println!("{}", render_report_json(&report)?),
        }
    }

    Ok(ok)
}
