//! Configuration projections for operator-facing adapters.

use serde::Serialize;

use crate::domain::catalog::{Asset, Exchange};
use crate::domain::tier::SubscriptionTier;
use crate::error::Result;

/// Scanner section of a configuration view.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigScanner {
    pub enabled: bool,
    pub interval_secs: u64,
    pub stop_timeout_secs: u64,
}

/// Price source section of a configuration view.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigPriceSource {
    pub base_url: String,
    /// Whether an API key was found in the environment. The key itself is
    /// never projected.
    pub api_key_set: bool,
    pub quote_targets: Vec<String>,
    pub min_request_interval_ms: u64,
}

/// Which external channels are configured.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigChannels {
    pub email: bool,
    pub telegram: bool,
    pub whatsapp: bool,
}

/// Full configuration projection for operator-facing output.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigView {
    pub database: String,
    pub log_level: String,
    pub log_format: String,
    pub scanner: ConfigScanner,
    pub price_source: ConfigPriceSource,
    pub exchanges: Vec<Exchange>,
    pub assets: Vec<Asset>,
    pub tiers: Vec<SubscriptionTier>,
    pub channels: ConfigChannels,
}

/// Validation output for `config validate`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigValidationReport {
    pub enabled_exchanges: usize,
    pub enabled_assets: usize,
    pub tiers: usize,
    /// Problems that do not stop a scan but limit what it can do.
    pub warnings: Vec<String>,
}

/// Configuration use-cases for operator-facing adapters.
pub trait ConfigurationOperator: Send + Sync {
    /// Build a projection for `config show`.
    fn show_config(&self, config_toml: &str) -> Result<ConfigView>;

    /// Validate config and return non-fatal warnings.
    fn validate_config(&self, config_toml: &str) -> Result<ConfigValidationReport>;
}
