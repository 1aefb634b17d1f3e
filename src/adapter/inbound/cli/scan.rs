//! Handler for the `scan` command.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::domain::scan::{ScanReport, ScanStatus};
use crate::error::Result;
use crate::port::inbound::operator::port::OperatorPort;

/// Run one scan and print its report.
pub async fn execute(service: &dyn OperatorPort, config_toml: &str) -> Result<()> {
    let report = service.scan_once(config_toml).await?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &ScanReport) {
    if output::is_json() {
        output::json_output(json!({
            "command": "scan",
            "report": report,
        }));
        return;
    }

    output::section("Scan Report");
    match report.status {
        ScanStatus::Completed => output::success("Scan completed"),
        ScanStatus::SourceUnhealthy => {
            output::warning("Price source is unreachable, scan skipped");
            return;
        }
        ScanStatus::Cancelled => output::warning("Scan was cancelled"),
    }

    let elapsed = report.finished_at - report.started_at;
    output::field("Duration", format!("{}ms", elapsed.num_milliseconds()));
    output::field("Prices", report.price_points);
    output::field("Found", report.opportunities_found);
    output::field("Stored", output::highlight(report.opportunities_stored));
    output::field(
        "Users",
        format!("{} notified of {}", report.users_notified, report.users_considered),
    );

    let failed = report.deliveries_attempted - report.deliveries_succeeded;
    let deliveries = if failed == 0 {
        output::positive(report.deliveries_succeeded)
    } else {
        format!(
            "{} ({} failed)",
            report.deliveries_succeeded,
            output::negative(failed)
        )
    };
    output::field("Deliveries", deliveries);

    if report.opportunities_found > 0 {
        output::hint(&format!(
            "run {} to list them",
            output::highlight("arbscan opportunities")
        ));
    }
}
