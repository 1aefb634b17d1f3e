//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};
use crate::port::inbound::operator::port::OperatorPort;

/// Default config template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../../../config.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your settings", path.display()));
    output::note("2. Set TELEGRAM_BOT_TOKEN and other channel secrets as needed");
    output::note(&format!("3. Run: arbscan -c {} check", path.display()));
    output::note(&format!("4. Run: arbscan -c {} run", path.display()));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(service: &dyn OperatorPort, config_toml: &str) -> Result<()> {
    let view = service.show_config(config_toml)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "config": view,
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field("Database", &view.database);
    output::field("Log level", &view.log_level);
    output::field("Log format", &view.log_format);

    output::section("Scanner");
    output::field("Enabled", view.scanner.enabled);
    output::field("Interval", format!("{}s", view.scanner.interval_secs));
    output::field("Stop timeout", format!("{}s", view.scanner.stop_timeout_secs));

    output::section("Price Source");
    output::field("URL", &view.price_source.base_url);
    output::field(
        "API key",
        if view.price_source.api_key_set {
            "set"
        } else {
            "not set"
        },
    );
    output::field("Quotes", view.price_source.quote_targets.join(", "));
    output::field(
        "Spacing",
        format!("{}ms", view.price_source.min_request_interval_ms),
    );

    output::section("Catalog");
    for exchange in &view.exchanges {
        let state = if exchange.enabled { "" } else { " (disabled)" };
        output::note(&format!(
            "- {} taker {} maker {}{state}",
            exchange.id, exchange.taker_fee, exchange.maker_fee
        ));
    }
    for asset in &view.assets {
        let state = if asset.enabled { "" } else { " (disabled)" };
        output::note(&format!("- {} ({}){state}", asset.symbol, asset.id));
    }

    output::section("Tiers");
    for tier in &view.tiers {
        let channels: Vec<&str> = tier
            .notification_channels
            .iter()
            .map(|channel| channel.as_str())
            .collect();
        output::field(&tier.name, channels.join(", "));
    }

    output::section("Channels");
    output::field("Email", view.channels.email);
    output::field("Telegram", view.channels.telegram);
    output::field("WhatsApp", view.channels.whatsapp);

    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(service: &dyn OperatorPort, config_toml: &str, path: &Path) -> Result<()> {
    let report = service.validate_config(config_toml)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "valid": true,
            "path": path.display().to_string(),
            "report": report,
        }));
        return Ok(());
    }

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::field("Exchanges", report.enabled_exchanges);
    output::field("Assets", report.enabled_assets);
    output::field("Tiers", report.tiers);
    for warning in &report.warnings {
        output::warning(warning);
    }
    output::success("Configuration file is valid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_is_a_toml_document() {
        let value: toml::Value = toml::from_str(CONFIG_TEMPLATE).unwrap();

        assert_eq!(value["database"].as_str(), Some("arbscan.db"));
        assert_eq!(value["catalog"]["exchanges"].as_array().unwrap().len(), 6);
        assert_eq!(value["tiers"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn init_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        execute_init(&path, false).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "# mine").unwrap();

        assert!(execute_init(&path, false).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine");

        execute_init(&path, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG_TEMPLATE);
    }
}
