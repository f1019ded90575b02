mod config;
pub mod migrations;
pub mod shift_db;

pub use config::{Config, PayConfig, SyncConfig};
pub use shift_db::{ShiftDb, ShiftEntry};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the shiftbook data directory, creating it if needed.
///
/// `SHIFTBOOK_DATA_DIR` overrides the location entirely. Otherwise the
/// directory is `~/.config/shiftbook/`, or `~/.config/shiftbook-dev/` when
/// `SHIFTBOOK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("SHIFTBOOK_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SHIFTBOOK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("shiftbook-dev")
            } else {
                base_dir.join("shiftbook")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
