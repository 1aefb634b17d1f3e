//! Routes a parsed command line to its handler.

use crate::adapter::inbound::cli::command::{Cli, Commands, ConfigCommand, UsersCommand};
use crate::adapter::inbound::cli::output::{self, OutputConfig};
use crate::adapter::inbound::cli::{
    check, config, inbox, operator, opportunities, run, scan, users,
};
use crate::error::Result;
use crate::port::inbound::operator::port::OperatorPort;

/// Execute a parsed command line against `service`.
///
/// # Errors
/// Returns the first error raised by the selected handler.
pub async fn execute(cli: Cli, service: &dyn OperatorPort) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    let path = cli.config.as_path();
    let config_toml = || operator::read_config_toml(path);

    match cli.command {
        Commands::Run(args) => run::execute(service, config_toml()?, &args).await,
        Commands::Scan => scan::execute(service, &config_toml()?).await,
        Commands::Check => check::execute(service, &config_toml()?).await,
        Commands::Opportunities(args) => {
            opportunities::execute(service, &config_toml()?, args.limit)
        }
        Commands::Config(ConfigCommand::Init(args)) => config::execute_init(path, args.force),
        Commands::Config(ConfigCommand::Show) => config::execute_show(service, &config_toml()?),
        Commands::Config(ConfigCommand::Validate) => {
            config::execute_validate(service, &config_toml()?, path)
        }
        Commands::Users(UsersCommand::Import(args)) => {
            users::execute_import(service, &config_toml()?, &args.path)
        }
        Commands::Users(UsersCommand::List) => users::execute_list(service, &config_toml()?),
        Commands::Inbox(args) => inbox::execute(service, &config_toml()?, &args),
    }
}
