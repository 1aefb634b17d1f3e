//! Runtime operator implementation.

use async_trait::async_trait;
use tokio::signal;
use tracing::info;

use crate::domain::scan::ScanReport;
use crate::error::Result;
use crate::infrastructure::bootstrap::channel_registry;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::operator::runtime::{RunRequest, RunStartupSnapshot, RuntimeOperator};

use super::entry::Operator;

#[async_trait]
impl RuntimeOperator for Operator {
    fn prepare_run(&self, request: &RunRequest) -> Result<RunStartupSnapshot> {
        let config = Self::load_run_config(request)?;
        let channels = channel_registry(&config.channels)
            .channels()
            .into_iter()
            .map(|channel| channel.as_str().to_string())
            .collect();

        Ok(RunStartupSnapshot {
            interval_secs: config.scanner.interval_secs,
            scanner_enabled: config.scanner.enabled,
            exchanges: config.catalog.exchanges.iter().filter(|e| e.enabled).count(),
            assets: config.catalog.assets.iter().filter(|a| a.enabled).count(),
            channels,
            price_source_url: config.price_source.base_url,
            database: config.database,
        })
    }

    async fn execute_run(&self, request: RunRequest) -> Result<()> {
        let config = Self::load_run_config(&request)?;
        config.init_logging();

        if !config.scanner.enabled {
            info!("Scanner disabled in configuration, exiting");
            return Ok(());
        }

        info!(
            interval_secs = config.scanner.interval_secs,
            database = %config.database,
            "arbscan starting"
        );

        let app = self.app(config)?;
        app.scanner.start();

        signal::ctrl_c().await?;
        info!("Shutdown signal received (Ctrl+C)");

        app.scanner.stop().await;
        info!("arbscan stopped");
        Ok(())
    }

    async fn scan_once(&self, config_toml: &str) -> Result<ScanReport> {
        let config = Config::parse_toml(config_toml)?;
        let app = self.app(config)?;
        app.scanner.scan_now().await
    }
}

impl Operator {
    fn load_run_config(request: &RunRequest) -> Result<Config> {
        let mut config = Config::parse_toml(&request.config_toml)?;
        Self::apply_run_overrides(&mut config, request);
        config.validate()?;
        Ok(config)
    }

    fn apply_run_overrides(config: &mut Config, request: &RunRequest) {
        if let Some(ref log_level) = request.log_level {
            config.logging.level.clone_from(log_level);
        }

        if request.json_logs {
            config.logging.format = "json".to_string();
        }

        if let Some(interval) = request.interval_secs {
            config.scanner.interval_secs = interval;
        }

        if let Some(ref database) = request.database_path {
            config.database.clone_from(database);
        }
    }
}
