//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; secrets (API keys, bot tokens)
//! only ever come from the environment.
//!
//! # Example
//!
//! ```no_run
//! use arbscan::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("arbscan.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::catalog::CatalogConfig;
use super::logging::LoggingConfig;
use crate::adapter::outbound::channel::email::EmailConfig;
use crate::adapter::outbound::channel::whatsapp::WhatsappConfig;
use crate::adapter::outbound::coingecko::settings::CoinGeckoConfig;
use crate::domain::tier::{SubscriptionTier, TierTable};
use crate::error::{ConfigError, Result};

/// `[scanner]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// Start the background loop with `arbscan run`.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Wait between the end of one scan and the start of the next.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// How long `stop` waits for the loop before aborting it.
    #[serde(default = "default_stop_timeout_secs")]
    pub stop_timeout_secs: u64,
}

const fn default_true() -> bool {
    true
}

const fn default_interval_secs() -> u64 {
    300
}

const fn default_stop_timeout_secs() -> u64 {
    10
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_interval_secs(),
            stop_timeout_secs: default_stop_timeout_secs(),
        }
    }
}

impl ScannerConfig {
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    #[must_use]
    pub const fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }
}

/// `[channels]` section. In-app delivery is always available; the others
/// are registered only when configured and their secrets are present.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelsConfig {
    #[serde(default)]
    pub email: Option<EmailConfig>,
    /// Telegram needs only `TELEGRAM_BOT_TOKEN`; set false to ignore it.
    #[serde(default = "default_true")]
    pub telegram: bool,
    #[serde(default)]
    pub whatsapp: Option<WhatsappConfig>,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            email: None,
            telegram: true,
            whatsapp: None,
        }
    }
}

/// Main application configuration.
///
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub scanner: ScannerConfig,

    /// CoinGecko connection, pacing and retry settings.
    #[serde(default)]
    pub price_source: CoinGeckoConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Subscription tiers. Defaults to free, pro and enterprise.
    #[serde(default = "default_tiers")]
    pub tiers: Vec<SubscriptionTier>,

    #[serde(default)]
    pub channels: ChannelsConfig,

    /// Path to SQLite database file, or `:memory:` for a process-local
    /// store.
    #[serde(default = "default_database_path")]
    pub database: String,
}

fn default_tiers() -> Vec<SubscriptionTier> {
    vec![
        SubscriptionTier::free(),
        SubscriptionTier::pro(),
        SubscriptionTier::enterprise(),
    ]
}

fn default_database_path() -> String {
    "arbscan.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            scanner: ScannerConfig::default(),
            price_source: CoinGeckoConfig::default(),
            catalog: CatalogConfig::default(),
            tiers: default_tiers(),
            channels: ChannelsConfig::default(),
            database: default_database_path(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Loads the optional CoinGecko API key from `COINGECKO_API_KEY` and the
    /// mail relay key from `MAIL_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation
    /// fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.price_source = config.price_source.with_env_api_key();
        config.channels.email = config.channels.email.map(EmailConfig::with_env_api_key);

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.scanner.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.scanner.stop_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "stop_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.price_source.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "base_url" }.into());
        }
        url::Url::parse(&self.price_source.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "base_url",
            reason: e.to_string(),
        })?;
        if self.price_source.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_retries",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.price_source.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        self.validate_catalog()?;
        self.validate_tiers()?;

        if let Some(email) = &self.channels.email {
            if email.relay_url.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "relay_url" }.into());
            }
            if !email.from_address.contains('@') {
                return Err(ConfigError::InvalidValue {
                    field: "from_address",
                    reason: "must be an email address".to_string(),
                }
                .into());
            }
        }

        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        Ok(())
    }

    fn validate_catalog(&self) -> Result<()> {
        let catalog = &self.catalog;
        if !(Decimal::ZERO..Decimal::ONE).contains(&catalog.default_slippage) {
            return Err(ConfigError::InvalidValue {
                field: "default_slippage",
                reason: "must be between 0 and 1".to_string(),
            }
            .into());
        }

        let mut seen = HashSet::new();
        for exchange in &catalog.exchanges {
            if !seen.insert(exchange.id.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "exchanges",
                    reason: format!("duplicate exchange id '{}'", exchange.id),
                }
                .into());
            }
            for fee in [exchange.taker_fee, exchange.maker_fee] {
                if !(Decimal::ZERO..Decimal::ONE).contains(&fee) {
                    return Err(ConfigError::InvalidValue {
                        field: "exchange_fee",
                        reason: format!("fee for '{}' must be between 0 and 1", exchange.id),
                    }
                    .into());
                }
            }
        }
        if !catalog.exchanges.iter().any(|e| e.enabled) {
            return Err(ConfigError::InvalidValue {
                field: "exchanges",
                reason: "at least one exchange must be enabled".to_string(),
            }
            .into());
        }

        let mut seen = HashSet::new();
        for asset in &catalog.assets {
            if !seen.insert(asset.id.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "assets",
                    reason: format!("duplicate asset id '{}'", asset.id),
                }
                .into());
            }
            if let Some(slippage) = asset.slippage {
                if !(Decimal::ZERO..Decimal::ONE).contains(&slippage) {
                    return Err(ConfigError::InvalidValue {
                        field: "slippage",
                        reason: format!("slippage for '{}' must be between 0 and 1", asset.id),
                    }
                    .into());
                }
            }
        }
        if !catalog.assets.iter().any(|a| a.enabled) {
            return Err(ConfigError::InvalidValue {
                field: "assets",
                reason: "at least one asset must be enabled".to_string(),
            }
            .into());
        }

        Ok(())
    }

    fn validate_tiers(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for tier in &self.tiers {
            if !seen.insert(tier.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "tiers",
                    reason: format!("duplicate tier '{}'", tier.name),
                }
                .into());
            }
            if tier.max_exchanges == Some(0) || tier.max_assets == Some(0) {
                return Err(ConfigError::InvalidValue {
                    field: "tiers",
                    reason: format!("tier '{}' limits must be greater than 0", tier.name),
                }
                .into());
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn tier_table(&self) -> TierTable {
        TierTable::new(self.tiers.iter().cloned())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml("").unwrap();

        assert_eq!(config.scanner.interval_secs, 300);
        assert_eq!(config.scanner.stop_timeout_secs, 10);
        assert_eq!(config.price_source.min_request_interval_ms, 7_000);
        assert_eq!(config.catalog.exchanges[0].id.as_str(), "binance");
        assert_eq!(config.tier_table().resolve("pro").max_exchanges, Some(5));
        assert_eq!(config.database, "arbscan.db");
    }

    #[test]
    fn catalog_entries_parse_with_defaults() {
        let config = Config::parse_toml(
            r#"
            [catalog]
            default_slippage = "0.003"

            [[catalog.exchanges]]
            id = "binance"
            name = "Binance"
            taker_fee = "0.002"

            [[catalog.assets]]
            id = "bitcoin"
            symbol = "BTC"
            slippage = "0.001"
            "#,
        )
        .unwrap();

        let catalog = config.catalog.to_catalog();
        let binance = catalog.exchange(&"binance".into()).unwrap();
        assert_eq!(binance.taker_fee, dec!(0.002));
        assert_eq!(binance.maker_fee, dec!(0.001));
        assert_eq!(catalog.slippage(&"bitcoin".into()), dec!(0.001));
        assert_eq!(catalog.slippage(&"unknown".into()), dec!(0.003));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = Config::parse_toml("[scanner]\ninterval_secs = 0").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "interval_secs",
                ..
            })
        ));
    }

    #[test]
    fn fee_of_one_is_rejected() {
        let err = Config::parse_toml(
            r#"
            [[catalog.exchanges]]
            id = "x"
            name = "X"
            taker_fee = "1"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("fee"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Config::parse_toml(
            r#"
            [[catalog.assets]]
            id = "bitcoin"
            symbol = "BTC"

            [[catalog.assets]]
            id = "bitcoin"
            symbol = "BTC"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate asset id"));
    }

    #[test]
    fn all_disabled_exchanges_are_rejected() {
        let err = Config::parse_toml(
            r#"
            [[catalog.exchanges]]
            id = "x"
            name = "X"
            enabled = false
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("at least one exchange"));
    }

    #[test]
    fn zero_tier_limit_is_rejected() {
        let err = Config::parse_toml(
            r#"
            [[tiers]]
            name = "free"
            max_exchanges = 0
            notification_channels = ["in_app"]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("limits must be greater than 0"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::parse_toml("[scanner").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
