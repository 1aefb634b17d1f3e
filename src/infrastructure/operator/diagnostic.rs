//! Diagnostic operator implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::health;
use crate::port::inbound::operator::diagnostic::{DiagnosticOperator, HealthCheckReport};

use super::{entry::Operator, shared};

#[async_trait]
impl DiagnosticOperator for Operator {
    async fn health_check(&self, config_toml: &str) -> Result<HealthCheckReport> {
        let config = Config::parse_toml(config_toml)?;
        let source = self.price_source(&config);
        let report = health::health_check(&config, source.as_ref()).await;
        Ok(shared::map_health_report(&report))
    }
}
