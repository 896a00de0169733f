mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, ContentConfig, SessionDefaults, StorageConfig, TextConfig};
pub use database::{Database, StoredResult};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns `~/.config/finyap[-dev]/` based on FINYAP_ENV.
///
/// Set FINYAP_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FINYAP_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("finyap-dev")
    } else {
        base_dir.join("finyap")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
