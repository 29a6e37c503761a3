use std::path::{Path, PathBuf};

use lexsem_core::TableFormat;
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE: &str = "lexsem.toml";

/// Written by `lexsem init`.
pub const DEFAULT_CONFIG: &str = r#"# Names treated as defined in every function, on top of the Python builtins.
extra_builtins = []

# Directory that receives the generated DOT graphs.
output_dir = "images"

# Token table layout: "plain", "markdown", "csv" or "json".
table_format = "plain"

# Extension of the files collected when a directory is analyzed.
source_extension = "py"
"#;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub extra_builtins: Vec<String>,
    pub output_dir: PathBuf,
    pub table_format: TableFormat,
    pub source_extension: String,
}

impl From<RawConfig> for Config {
    fn from(raw_config: RawConfig) -> Self {
        let defaults = Config::default();
        Self {
            extra_builtins: raw_config.extra_builtins.unwrap_or(defaults.extra_builtins),
            output_dir: raw_config
                .output_dir
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            table_format: raw_config.table_format.unwrap_or(defaults.table_format),
            source_extension: raw_config
                .source_extension
                .map(|extension| extension.trim_start_matches('.').to_string())
                .unwrap_or(defaults.source_extension),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    extra_builtins: Option<Vec<String>>,
    output_dir: Option<String>,
    table_format: Option<TableFormat>,
    source_extension: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extra_builtins: vec![],
            output_dir: "images".into(),
            table_format: TableFormat::Plain,
            source_extension: "py".into(),
        }
    }
}

/// Reads the configuration at `path`, which must exist.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let config = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    convert_from_toml(&config).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn load_project_config<P: AsRef<Path>>(root_dir: P) -> Result<Option<Config>> {
    let config_path = root_dir.as_ref().join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    };

    load_config_file(config_path).map(Some)
}

pub fn convert_from_toml(config: &str) -> Result<Config, toml::de::Error> {
    let raw_config: RawConfig = toml::from_str(config)?;
    Ok(raw_config.into())
}

/// Looks for `lexsem.toml` in `root_dir`. A missing file yields the
/// defaults; a file that does not parse is an error.
pub fn load_config<P: AsRef<Path>>(root_dir: Option<P>) -> Result<Config> {
    match root_dir {
        Some(root_dir) => Ok(load_project_config(root_dir)?.unwrap_or_default()),
        None => Ok(Config::default()),
    }
}
