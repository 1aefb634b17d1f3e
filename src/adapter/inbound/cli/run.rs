//! Handler for the `run` command.

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::port::inbound::operator::port::OperatorPort;
use crate::port::inbound::operator::runtime::{RunRequest, RunStartupSnapshot};

/// Execute the run command: start the scan loop and stop it on Ctrl-C.
pub async fn execute(service: &dyn OperatorPort, config_toml: String, args: &RunArgs) -> Result<()> {
    let request = build_run_request(args, config_toml, output::is_json());
    let startup = service.prepare_run(&request)?;
    print_startup_config(&startup);

    if !startup.scanner_enabled {
        output::warning("Scanner is disabled in the configuration ([scanner].enabled = false)");
        return Ok(());
    }

    service.execute_run(request).await?;
    output::success("Scanner stopped");
    Ok(())
}

fn build_run_request(args: &RunArgs, config_toml: String, force_json_logs: bool) -> RunRequest {
    RunRequest {
        config_toml,
        interval_secs: args.interval,
        log_level: args.log_level.clone(),
        json_logs: args.json_logs || force_json_logs,
        database_path: args.database.clone(),
    }
}

/// Print startup configuration using Astral-style output.
fn print_startup_config(snapshot: &RunStartupSnapshot) {
    if output::is_quiet() && !output::is_json() {
        return;
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Database", &snapshot.database);
    output::field("Interval", format!("{}s", snapshot.interval_secs));
    output::field("Exchanges", snapshot.exchanges);
    output::field("Assets", snapshot.assets);
    output::field("Channels", snapshot.channels.join(", "));

    if output::verbosity() > 0 {
        output::field("Price source", &snapshot.price_source_url);
    }
}
