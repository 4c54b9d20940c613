mod config;
pub mod database;

pub use config::{Config, NotificationsConfig, SoundConfig, TimerSection};
pub use database::{keys, Database};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns the data directory, creating it if needed.
///
/// `FOCUSFLOW_HOME` wins when set. Otherwise `~/.config/focusflow[-dev]/`,
/// with `FOCUSFLOW_ENV=dev` selecting the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("FOCUSFLOW_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .ok_or_else(|| ConfigError::DataDir("home directory not found".into()))?
                .join(".config");
            let env = std::env::var("FOCUSFLOW_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusflow-dev")
            } else {
                base_dir.join("focusflow")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
