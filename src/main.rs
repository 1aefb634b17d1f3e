use arbscan::adapter::inbound::cli::command::{Cli, Commands};
use arbscan::adapter::inbound::cli::dispatch;
use arbscan::adapter::inbound::cli::output::{self, OutputConfig};
use arbscan::infrastructure::config::logging::LoggingConfig;
use arbscan::infrastructure::operator::entry::Operator;
use clap::Parser;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // `run` sets up logging from its configuration.
    if !matches!(cli.command, Commands::Run(_)) {
        let out = OutputConfig::new(cli.json, cli.quiet, cli.verbose);
        LoggingConfig {
            level: out.log_level().to_string(),
            format: "pretty".to_string(),
        }
        .init_stderr();
    }

    if let Err(e) = dispatch::execute(cli, &Operator::new()).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
