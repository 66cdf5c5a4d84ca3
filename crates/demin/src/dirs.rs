//! Platform-specific locations for demin's configuration files

use std::path::PathBuf;

use etcetera::base_strategy::{BaseStrategy, choose_base_strategy};

/// File name looked up in the user config directory and in the working directory
pub const CONFIG_FILE_NAME: &str = "demin.toml";

/// Directory holding the user-level configuration (`~/.config/demin` on Linux)
pub fn user_config_dir() -> Option<PathBuf> {
    match choose_base_strategy() {
        Ok(strategy) => Some(strategy.config_dir().join("demin")),
        Err(err) => {
            log::debug!("No home directory for user configuration: {err}");
            None
        }
    }
}

/// Path of the user-level configuration file, whether or not it exists
pub fn user_config_file() -> Option<PathBuf> {
    user_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
