use std::path::Path;

use anyhow::{Context, Result, bail};
use lexsem_config::{CONFIG_FILE, DEFAULT_CONFIG};

/// Writes the default configuration into `path`, or the working directory.
/// An existing configuration file is never overwritten.
pub fn run(path: Option<&Path>) -> Result<()> {
    let dir = path.unwrap_or_else(|| Path::new("."));
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() {
        bail!("{} already exists", config_path.display());
    }

    std::fs::create_dir_all(dir).with_context(|| format!("could not create {}", dir.display()))?;
    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("could not write {}", config_path.display()))?;
    println!("Initialising in {}", dir.display());

    Ok(())
}
