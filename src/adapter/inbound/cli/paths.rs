//! Path utilities for deployctl.
//!
//! Per-user data lives under `~/.deployctl/`:
//! - `~/.deployctl/config.toml` - fallback configuration

use std::path::PathBuf;

use crate::infrastructure::config::settings::DEFAULT_CONFIG_PATH;

/// Returns the deployctl home directory (`~/.deployctl/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".deployctl")
}

/// Returns the config file to use when none is given.
///
/// A `deployctl.toml` in the current directory wins over
/// `~/.deployctl/config.toml`.
pub fn default_config() -> PathBuf {
    let local = PathBuf::from(DEFAULT_CONFIG_PATH);
    if local.exists() {
        local
    } else {
        home_dir().join("config.toml")
    }
}
