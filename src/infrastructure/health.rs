//! Runtime health reporting.

use serde::Serialize;

use crate::infrastructure::config::settings::Config;
use crate::port::outbound::price_source::PriceSource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    name: &'static str,
    critical: bool,
    status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &'static str, critical: bool, problem: Option<String>) -> Self {
        Self {
            name,
            critical,
            status: problem.map_or(HealthStatus::Healthy, HealthStatus::Unhealthy),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn critical(&self) -> bool {
        self.critical
    }

    pub fn status(&self) -> &HealthStatus {
        &self.status
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self.status, HealthStatus::Healthy)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    checks: Vec<HealthCheck>,
}

impl HealthReport {
    pub fn checks(&self) -> &[HealthCheck] {
        &self.checks
    }

    pub fn is_healthy(&self) -> bool {
        self.checks
            .iter()
            .filter(|check| check.critical())
            .all(HealthCheck::is_healthy)
    }
}

/// Static checks that need no network access.
pub fn config_health(config: &Config) -> HealthReport {
    let mut checks = Vec::new();

    checks.push(HealthCheck::new(
        "database",
        true,
        config
            .database
            .trim()
            .is_empty()
            .then(|| "database path is empty".to_string()),
    ));

    let exchanges = config.catalog.exchanges.iter().filter(|e| e.enabled).count();
    checks.push(HealthCheck::new(
        "exchanges",
        true,
        (exchanges < 2).then(|| format!("{exchanges} enabled exchange(s), need at least 2")),
    ));

    let assets = config.catalog.assets.iter().filter(|a| a.enabled).count();
    checks.push(HealthCheck::new(
        "assets",
        true,
        (assets == 0).then(|| "no enabled assets".to_string()),
    ));

    checks.push(HealthCheck::new(
        "price_source_key",
        false,
        config
            .price_source
            .api_key
            .is_none()
            .then(|| "no API key, using public rate limits".to_string()),
    ));

    HealthReport { checks }
}

/// Static checks plus a live check of the price source.
pub async fn health_check(config: &Config, source: &dyn PriceSource) -> HealthReport {
    let mut report = config_health(config);
    let reachable = source.health_check().await;
    report.checks.push(HealthCheck::new(
        "price_source",
        true,
        (!reachable).then(|| format!("{} is unreachable", source.name())),
    ));
    report
}
