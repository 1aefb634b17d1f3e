//! Handler for the `check` command.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::{Error, Result};
use crate::port::inbound::operator::diagnostic::{HealthCheckReport, HealthCheckStatus};
use crate::port::inbound::operator::port::OperatorPort;

/// Run the static checks and ping the price source.
///
/// # Errors
/// Returns [`Error::Unhealthy`] if any critical check fails.
pub async fn execute(service: &dyn OperatorPort, config_toml: &str) -> Result<()> {
    let report = service.health_check(config_toml).await?;
    print_report(&report);

    if report.is_healthy() {
        return Ok(());
    }
    Err(Error::Unhealthy(report.failed_critical().join(", ")))
}

fn print_report(report: &HealthCheckReport) {
    if output::is_json() {
        output::json_output(json!({
            "command": "check",
            "healthy": report.is_healthy(),
            "checks": report.checks,
        }));
        return;
    }

    output::section("Health Check");
    for check in &report.checks {
        match &check.status {
            HealthCheckStatus::Healthy => output::success(&check.name),
            HealthCheckStatus::Unhealthy(reason) if check.critical => {
                output::error(&format!("{}: {reason}", check.name));
            }
            HealthCheckStatus::Unhealthy(reason) => {
                output::warning(&format!("{}: {reason}", check.name));
            }
        }
    }

    if report.is_healthy() {
        output::success("Ready to scan");
    }
}
