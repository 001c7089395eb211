use crate::core::config::{API_KEY_ENV, AppConfig};
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

pub fn setup() -> Result<()> {
    let path = write_example_config(AppConfig::default_config_path()?)?;
    println!("Wrote starter configuration to {}", path.display());
    println!(
        "Add your exchangerate-api.com key there, or export {API_KEY_ENV}, to get live rates."
    );
    Ok(())
}

/// Writes the example config to `path`. An existing file is never overwritten.
pub fn write_example_config<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.exists() {
        bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    info!(path = %path.display(), "Created configuration file");
    Ok(path.to_path_buf())
}
