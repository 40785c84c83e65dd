mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, DefaultsConfig, EngineConfig, LoggingConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns the data directory, creating it if needed.
///
/// `CYCLETRACK_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/cycletrack[-dev]/`, with `CYCLETRACK_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("CYCLETRACK_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("CYCLETRACK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("cycletrack-dev")
            } else {
                base_dir.join("cycletrack")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {}", dir.display(), e)))?;
    Ok(dir)
}
