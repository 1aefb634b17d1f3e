//! Configuration operator implementation.

use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::operator::config::{
    ConfigChannels, ConfigPriceSource, ConfigScanner, ConfigValidationReport, ConfigView,
    ConfigurationOperator,
};

use super::{entry::Operator, shared};

impl ConfigurationOperator for Operator {
    fn show_config(&self, config_toml: &str) -> Result<ConfigView> {
        let config = Config::parse_toml(config_toml)?;

        Ok(ConfigView {
            database: config.database,
            log_level: config.logging.level,
            log_format: config.logging.format,
            scanner: ConfigScanner {
                enabled: config.scanner.enabled,
                interval_secs: config.scanner.interval_secs,
                stop_timeout_secs: config.scanner.stop_timeout_secs,
            },
            price_source: ConfigPriceSource {
                base_url: config.price_source.base_url,
                api_key_set: config.price_source.api_key.is_some(),
                quote_targets: config.price_source.quote_targets,
                min_request_interval_ms: config.price_source.min_request_interval_ms,
            },
            exchanges: config.catalog.exchanges,
            assets: config.catalog.assets,
            tiers: config.tiers,
            channels: ConfigChannels {
                email: config.channels.email.is_some(),
                telegram: config.channels.telegram,
                whatsapp: config.channels.whatsapp.is_some(),
            },
        })
    }

    fn validate_config(&self, config_toml: &str) -> Result<ConfigValidationReport> {
        let config = Config::parse_toml(config_toml)?;

        Ok(ConfigValidationReport {
            enabled_exchanges: config.catalog.exchanges.iter().filter(|e| e.enabled).count(),
            enabled_assets: config.catalog.assets.iter().filter(|a| a.enabled).count(),
            tiers: config.tiers.len(),
            warnings: validation_warnings(&config),
        })
    }
}

fn validation_warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.scanner.enabled {
        warnings.push("Scanner is disabled; `run` exits immediately".to_string());
    }

    if config.price_source.api_key.is_none() {
        warnings.push("COINGECKO_API_KEY not set, public rate limits apply".to_string());
    }

    #[cfg(feature = "telegram")]
    if config.channels.telegram
        && crate::adapter::outbound::channel::telegram::TelegramConfig::from_env().is_none()
    {
        warnings.push("Telegram enabled but TELEGRAM_BOT_TOKEN not set".to_string());
    }

    if let Some(whatsapp) = &config.channels.whatsapp {
        if whatsapp.clone().with_env_credentials().is_none() {
            warnings.push("WhatsApp configured but its credentials are not set".to_string());
        }
    }

    for tier in &config.tiers {
        for channel in &tier.notification_channels {
            if !shared::channel_configured(config, *channel) {
                warnings.push(format!(
                    "Tier '{}' offers {} but the channel is not configured",
                    tier.name,
                    channel.as_str()
                ));
            }
        }
    }

    warnings
}
