mod core;
mod features;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::core::source_manager::SourceManager;
use crate::features::check::CheckFormat;
use crate::features::graph::GraphKind;
use crate::features::tokens::TokenFormat;

#[derive(Parser, Debug)]
#[command(version, about = "Lexical, syntactic and semantic analysis of Python sources", long_about = None)]
struct Cli {
    /// Configuration file to use instead of ./lexsem.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More logging on stderr (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Prints the classified token table of a file or directory
    Tokens {
        path: PathBuf,

        /// Table layout; defaults to the configured `table_format`
        #[arg(short, long)]
        format: Option<TokenFormat>,
    },
    /// Runs the semantic passes and reports their findings
    Check {
        path: PathBuf,

        #[arg(short, long, default_value = "text")]
        format: CheckFormat,
    },
    /// Prints the simplified semantic tree of a file
    Tree { file: PathBuf },
    /// Writes a Graphviz DOT graph of a file
    Graph {
        file: PathBuf,

        #[arg(short, long, default_value = "flow")]
        kind: GraphKind,

        /// Defaults to `<output_dir>/<stem>_<kind>.dot`
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Creates a lexsem.toml on the current working directory or on the specified path
    Init {
        /// The path to create the lexsem.toml file in.
        path: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<lexsem_config::Config> {
    match path {
        Some(path) => lexsem_config::load_config_file(path)
            .with_context(|| format!("could not load configuration from {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("could not read the working directory")?;
            lexsem_config::load_config(Some(cwd)).context("could not load lexsem.toml")
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    if let Commands::Init { path } = &cli.command {
        features::init::run(path.as_deref())?;
        return Ok(true);
    }

    let config = load_config(cli.config.as_ref())?;
    let sources = SourceManager::new(config);

    match cli.command {
        Commands::Tokens { path, format } => features::tokens::run(&sources, &path, format),
        Commands::Check { path, format } => features::check::run(&sources, &path, format),
        Commands::Tree { file } => features::tree::run(&sources, &file),
        Commands::Graph { file, kind, output } => {
            features::graph::run(&sources, &file, kind, output.as_deref())
        }
        Commands::Init { .. } => Ok(true),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
