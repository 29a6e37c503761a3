use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use lexsem_core::TableFormat;
use lexsem_report::{compact_listing, render_table, token_rows};
use lexsem_token::{Classifier, PrimitiveToken, tokenize};
use tracing::warn;

use crate::core::source_manager::SourceManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TokenFormat {
    Plain,
    Markdown,
    Csv,
    Json,
    /// One line per source line, tokens in parenthesized form
    Compact,
}

impl From<TableFormat> for TokenFormat {
    fn from(format: TableFormat) -> Self {
        match format {
            TableFormat::Plain => TokenFormat::Plain,
            TableFormat::Markdown => TokenFormat::Markdown,
            TableFormat::Csv => TokenFormat::Csv,
            TableFormat::Json => TokenFormat::Json,
        }
    }
}

pub fn run(sources: &SourceManager, path: &Path, format: Option<TokenFormat>) -> Result<bool> {
    let format = format.unwrap_or_else(|| sources.config().table_format.into());
    let classifier = Classifier::standard()?;
    let paths = sources.collect(path)?;
    let print_headers = paths.len() > 1;
    let mut ok = true;

    for path in paths {
        let file = sources.read(&path)?;
        let tokens = match tokenize(&file.content) {
            Ok(tokens) => tokens,
            Err(error) => {
                warn!(path = %path.display(), %error, "could not tokenize");
                eprintln!("{}: {error}", path.display());
                ok = false;
                continue;
            }
        };

        if print_headers {
            println!("==> {} <==", path.display());
        }

        let output = match format {
            TokenFormat::Compact => compact_listing(&tokens, &file.content),
            TokenFormat::Plain => table(&classifier, &tokens, &file.content, TableFormat::Plain)?,
            TokenFormat::Markdown => table(&classifier, &tokens, &file.content, TableFormat::Markdown)?,
            TokenFormat::Csv => table(&classifier, &tokens, &file.content, TableFormat::Csv)?,
            TokenFormat::Json => table(&classifier, &tokens, &file.content, TableFormat::Json)?,
        };
        println!("{output}");
    }

    Ok(ok)
}

fn table(
    classifier: &Classifier,
    tokens: &[lexsem_token::Token],
    content: &str,
    format: TableFormat,
) -> Result<String> {
    let primitive: Vec<_> = tokens
        .iter()
        .filter_map(|token| PrimitiveToken::from_token(token, content))
        .collect();
    let classified = classifier.classify(&primitive);
    Ok(render_table(&token_rows(&classified), format)?)
}
