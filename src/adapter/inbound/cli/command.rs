//! Command-line interface definitions.
//!
//! Defines the CLI structure for arbscan using `clap`. Every subcommand
//! reads the same configuration file, selected with the global `--config`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::paths;

/// Cross-exchange crypto arbitrage scanner
#[derive(Parser, Debug)]
#[command(name = "arbscan")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scan loop until interrupted
    Run(RunArgs),

    /// Run a single scan and print its report
    Scan,

    /// Check configuration and price-source health
    Check,

    /// List active opportunities, best first
    Opportunities(OpportunitiesArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Manage subscribed users
    #[command(subcommand)]
    Users(UsersCommand),

    /// Show a user's in-app notifications
    Inbox(InboxArgs),
}

/// Subcommands for `arbscan config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a documented configuration file to the `--config` path.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate the configuration file for correctness.
    Validate,
}

/// Arguments for the `config init` subcommand.
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}

/// Subcommands for `arbscan users`.
#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// Insert or replace users from a JSON file of preference records.
    Import(UsersImportArgs),
    /// List active users.
    List,
}

/// Arguments for the `run` subcommand.
///
/// Optional fields override the corresponding configuration file values.
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Override the wait between scans, in seconds.
    #[arg(long)]
    pub interval: Option<u64>,

    /// Override log level (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,

    /// Override the database path.
    #[arg(long)]
    pub database: Option<String>,
}

/// Arguments for the `opportunities` subcommand.
#[derive(Parser, Debug)]
pub struct OpportunitiesArgs {
    /// Maximum number of rows to show.
    #[arg(long, default_value = "20")]
    pub limit: usize,
}

/// Arguments for the `users import` subcommand.
#[derive(Parser, Debug)]
pub struct UsersImportArgs {
    /// JSON file holding one preference record or an array of them.
    pub path: PathBuf,
}

/// Arguments for the `inbox` subcommand.
#[derive(Parser, Debug)]
pub struct InboxArgs {
    /// User whose notifications to show.
    pub user: String,

    /// Only show notifications not yet read.
    #[arg(long)]
    pub unread: bool,

    /// Maximum number of notifications to show.
    #[arg(long, default_value = "20")]
    pub limit: usize,

    /// Mark the notification with this id as read first.
    #[arg(long, value_name = "ID")]
    pub mark_read: Option<i64>,
}
