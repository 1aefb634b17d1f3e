//! CoinGecko price source configuration.

use std::time::Duration;

use serde::Deserialize;

/// Environment variable holding the optional pro API key.
pub const API_KEY_ENV: &str = "COINGECKO_API_KEY";

/// Connection, pacing and retry settings for the CoinGecko adapter.
///
/// Durations are in milliseconds so tests can shrink them.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinGeckoConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Minimum spacing between any two requests.
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
    /// Attempts per asset, including the first.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Unit multiplied by `backoff_factor ^ attempt` for transient errors.
    #[serde(default = "default_backoff_unit_ms")]
    pub backoff_unit_ms: u64,
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: u32,
    /// First wait after an HTTP 429, doubled per attempt.
    #[serde(default = "default_rate_limit_backoff_ms")]
    pub rate_limit_backoff_ms: u64,
    #[serde(default = "default_rate_limit_backoff_cap_ms")]
    pub rate_limit_backoff_cap_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_health_timeout_ms")]
    pub health_timeout_ms: u64,
    /// Quote currencies accepted from ticker `target`; empty accepts all.
    #[serde(default = "default_quote_targets")]
    pub quote_targets: Vec<String>,
    /// Read from [`API_KEY_ENV`], never from the config file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "https://api.coingecko.com/api/v3".into()
}

const fn default_min_request_interval_ms() -> u64 {
    7_000
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_backoff_unit_ms() -> u64 {
    1_000
}

const fn default_backoff_factor() -> u32 {
    2
}

const fn default_rate_limit_backoff_ms() -> u64 {
    60_000
}

const fn default_rate_limit_backoff_cap_ms() -> u64 {
    300_000
}

const fn default_timeout_ms() -> u64 {
    15_000
}

const fn default_health_timeout_ms() -> u64 {
    10_000
}

fn default_quote_targets() -> Vec<String> {
    vec!["USD".into(), "USDT".into(), "USDC".into()]
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            min_request_interval_ms: default_min_request_interval_ms(),
            max_retries: default_max_retries(),
            backoff_unit_ms: default_backoff_unit_ms(),
            backoff_factor: default_backoff_factor(),
            rate_limit_backoff_ms: default_rate_limit_backoff_ms(),
            rate_limit_backoff_cap_ms: default_rate_limit_backoff_cap_ms(),
            timeout_ms: default_timeout_ms(),
            health_timeout_ms: default_health_timeout_ms(),
            quote_targets: default_quote_targets(),
            api_key: None,
        }
    }
}

impl CoinGeckoConfig {
    /// Pick up the API key from the environment.
    #[must_use]
    pub fn with_env_api_key(mut self) -> Self {
        self.api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
        self
    }

    #[must_use]
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    /// Wait before retrying after a transient failure on `attempt`
    /// (1-based).
    #[must_use]
    pub fn transient_backoff(&self, attempt: u32) -> Duration {
        let multiplier = u64::from(self.backoff_factor).saturating_pow(attempt);
        Duration::from_millis(self.backoff_unit_ms.saturating_mul(multiplier))
    }

    /// Wait before retrying after an HTTP 429 on `attempt` (1-based).
    #[must_use]
    pub fn rate_limit_backoff(&self, attempt: u32) -> Duration {
        let doubled = self
            .rate_limit_backoff_ms
            .saturating_mul(1u64 << attempt.saturating_sub(1).min(32));
        Duration::from_millis(doubled.min(self.rate_limit_backoff_cap_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_backoff_grows_by_factor() {
        let config = CoinGeckoConfig::default();
        assert_eq!(config.transient_backoff(1), Duration::from_secs(2));
        assert_eq!(config.transient_backoff(2), Duration::from_secs(4));
    }

    #[test]
    fn rate_limit_backoff_is_capped() {
        let config = CoinGeckoConfig::default();
        assert_eq!(config.rate_limit_backoff(1), Duration::from_secs(60));
        assert_eq!(config.rate_limit_backoff(2), Duration::from_secs(120));
        assert_eq!(config.rate_limit_backoff(3), Duration::from_secs(240));
        assert_eq!(config.rate_limit_backoff(4), Duration::from_secs(300));
    }

    #[test]
    fn toml_overrides_keep_other_defaults() {
        let config: CoinGeckoConfig = toml::from_str("max_retries = 5").unwrap();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.min_request_interval_ms, 7_000);
        assert!(config.api_key.is_none());
    }
}
