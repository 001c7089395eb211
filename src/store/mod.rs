//! Key-value backends the goal store persists into.

pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use disk::DiskBackend;
use tracing::debug;

/// Opens the on-disk backend under the configured data directory.
pub fn open_backend(config: &AppConfig) -> Result<DiskBackend> {
    let data_path = config.default_data_path()?;
    debug!("Opening goal storage at {}", data_path.display());

    let backend = DiskBackend::open(&data_path)
        .with_context(|| format!("Failed to open goal storage at {}", data_path.display()))?;
    Ok(backend)
}
