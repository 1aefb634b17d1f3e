use std::path::{Path, PathBuf};

use arbscan::infrastructure::bootstrap::Stores;
use tempfile::TempDir;

/// Temporary SQLite database for integration tests.
///
/// The file lives in its own directory, removed on drop.
pub struct TempDb {
    _dir: TempDir,
    path: PathBuf,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(format!("arbscan-{name}.db"));
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Database path as it appears in the config file.
    pub fn database(&self) -> String {
        self.path.display().to_string()
    }

    /// `database = "..."` line for a TOML config.
    pub fn config_line(&self) -> String {
        format!("database = {:?}\n", self.database())
    }

    /// Open (and migrate) the stores on this file.
    pub fn stores(&self) -> Stores {
        Stores::open(&self.database()).expect("open sqlite stores")
    }
}
