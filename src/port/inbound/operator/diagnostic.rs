//! Diagnostic projections for operator-facing adapters.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Health status item for operator checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum HealthCheckStatus {
    Healthy,
    Unhealthy(String),
}

/// Individual health check entry.
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckEntry {
    pub name: String,
    pub critical: bool,
    pub status: HealthCheckStatus,
}

/// Health check report projection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthCheckReport {
    pub checks: Vec<HealthCheckEntry>,
}

impl HealthCheckReport {
    /// True when all critical checks are healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.checks
            .iter()
            .filter(|check| check.critical)
            .all(|check| matches!(&check.status, HealthCheckStatus::Healthy))
    }

    /// Names of the critical checks that failed.
    #[must_use]
    pub fn failed_critical(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|check| check.critical && check.status != HealthCheckStatus::Healthy)
            .map(|check| check.name.as_str())
            .collect()
    }
}

/// Diagnostics use-cases for operator-facing adapters.
#[async_trait]
pub trait DiagnosticOperator: Send + Sync {
    /// Run the static checks and ping the price source.
    async fn health_check(&self, config_toml: &str) -> Result<HealthCheckReport>;
}
