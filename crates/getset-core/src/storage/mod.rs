mod config;

pub use config::{BalanceConfig, CalendarConfig, Config, GapsConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the configuration directory.
///
/// `GETSET_CONFIG_DIR` wins when set. Otherwise `~/.config/getset[-dev]/`
/// based on GETSET_ENV; set GETSET_ENV=dev to use the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("GETSET_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("GETSET_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("getset-dev")
            } else {
                base_dir.join("getset")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
