//! Runtime control projection types for operator-facing adapters.
//!
//! Defines request and response types for starting the scan loop and
//! for running a single scan.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::scan::ScanReport;
use crate::error::Result;

/// Runtime configuration overrides from CLI flags.
///
/// Every `Some` field takes precedence over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Raw TOML configuration content.
    pub config_toml: String,

    /// Override for the wait between scans, in seconds.
    pub interval_secs: Option<u64>,

    /// Override for log level (e.g., "debug", "info", "warn").
    pub log_level: Option<String>,

    /// Whether to output logs as JSON.
    pub json_logs: bool,

    /// Override for database file path.
    pub database_path: Option<String>,
}

/// Startup information snapshot for display.
#[derive(Debug, Clone, Serialize)]
pub struct RunStartupSnapshot {
    pub database: String,
    pub interval_secs: u64,
    pub scanner_enabled: bool,
    pub exchanges: usize,
    pub assets: usize,
    /// Channels that will actually deliver, in-app first.
    pub channels: Vec<String>,
    pub price_source_url: String,
}

/// Runtime control use-cases for operator-facing adapters.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait RuntimeOperator: Send + Sync {
    /// Prepare a startup snapshot from runtime overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    fn prepare_run(&self, request: &RunRequest) -> Result<RunStartupSnapshot>;

    /// Run the scan loop until Ctrl-C, then stop it.
    ///
    /// Returns immediately when the scanner is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the database
    /// cannot be opened.
    async fn execute_run(&self, request: RunRequest) -> Result<()>;

    /// Run exactly one scan and return its report.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the database
    /// cannot be opened or the scan task fails.
    async fn scan_once(&self, config_toml: &str) -> Result<ScanReport>;
}
