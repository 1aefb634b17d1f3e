//! Shared helper routines for operator implementations.

use crate::domain::notification::Channel;
use crate::error::Result;
use crate::infrastructure::bootstrap::Stores;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::health::{HealthReport, HealthStatus};
use crate::port::inbound::operator::diagnostic::{
    HealthCheckEntry, HealthCheckReport, HealthCheckStatus,
};

pub(super) fn open_stores(config_toml: &str) -> Result<(Config, Stores)> {
    let config = Config::parse_toml(config_toml)?;
    let stores = Stores::open(&config.database)?;
    Ok((config, stores))
}

pub(super) fn map_health_report(report: &HealthReport) -> HealthCheckReport {
    HealthCheckReport {
        checks: report
            .checks()
            .iter()
            .map(|check| HealthCheckEntry {
                name: check.name().to_string(),
                critical: check.critical(),
                status: match check.status() {
                    HealthStatus::Healthy => HealthCheckStatus::Healthy,
                    HealthStatus::Unhealthy(reason) => HealthCheckStatus::Unhealthy(reason.clone()),
                },
            })
            .collect(),
    }
}

/// Whether `channel` can be delivered with this configuration, ignoring
/// secrets that only the environment provides.
pub(super) fn channel_configured(config: &Config, channel: Channel) -> bool {
    match channel {
        Channel::InApp => true,
        Channel::Email => config.channels.email.is_some(),
        Channel::Telegram => config.channels.telegram,
        Channel::Whatsapp => config.channels.whatsapp.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_app_is_always_configured() {
        let config = Config::parse_toml("").unwrap();

        assert!(channel_configured(&config, Channel::InApp));
        assert!(!channel_configured(&config, Channel::Email));
        assert!(!channel_configured(&config, Channel::Whatsapp));
    }

    #[test]
    fn missing_file_store_path_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arbscan.db");
        let toml = format!("database = {:?}", path.display().to_string());

        let (config, _stores) = open_stores(&toml).unwrap();

        assert_eq!(config.database, path.display().to_string());
        assert!(path.exists());
    }
}
