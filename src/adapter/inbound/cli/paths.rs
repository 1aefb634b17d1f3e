//! Path utilities for arbscan.
//!
//! User-level files live under `~/.arbscan/`:
//! - `~/.arbscan/config.toml` - main configuration

use std::path::PathBuf;

/// Returns the arbscan home directory (`~/.arbscan/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".arbscan")
}

/// Returns the default config file path (`~/.arbscan/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}
