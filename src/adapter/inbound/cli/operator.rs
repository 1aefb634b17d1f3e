//! Config loading shared by CLI handlers that call the operator port.

use std::io::ErrorKind;
use std::path::Path;

use crate::adapter::inbound::cli::paths;
use crate::error::{ConfigError, Result};

/// Load config TOML from disk for operator-facing use-cases.
///
/// A missing file at the default location yields an empty document, so
/// built-in defaults apply; a missing file anywhere else is an error.
///
/// # Errors
/// Returns [`ConfigError::ReadFile`] if the file cannot be read.
pub fn read_config_toml(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound && path == paths::default_config() => {
            Ok(String::new())
        }
        Err(e) => Err(ConfigError::ReadFile(e).into()),
    }
}
