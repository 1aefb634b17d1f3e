//! Config documents for integration tests.

use arbscan::adapter::outbound::coingecko::settings::CoinGeckoConfig;

/// Two exchanges, one asset, everything else at defaults.
pub fn small_catalog_toml(database_line: &str) -> String {
    format!(
        r#"{database_line}
[channels]
telegram = false

[catalog]
exchanges = [
    {{ id = "binance", name = "Binance" }},
    {{ id = "kraken", name = "Kraken" }},
]
assets = [{{ id = "bitcoin", symbol = "BTC", name = "Bitcoin" }}]
"#
    )
}

/// CoinGecko settings pointed at a stub with near-zero waits.
pub fn fast_coingecko(base_url: &str) -> CoinGeckoConfig {
    CoinGeckoConfig {
        base_url: base_url.to_string(),
        min_request_interval_ms: 0,
        max_retries: 3,
        backoff_unit_ms: 1,
        backoff_factor: 2,
        rate_limit_backoff_ms: 5,
        rate_limit_backoff_cap_ms: 20,
        timeout_ms: 2_000,
        health_timeout_ms: 2_000,
        ..CoinGeckoConfig::default()
    }
}
