//! yadsync CLI - one-way sync of a local folder to Yandex Disk
//!
//! Provides commands for:
//! - Running the periodic sync service
//! - Running a single cycle or a dry run
//! - Inspecting the remote folder and the configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use yadsync_core::config::Config;

mod commands;
mod logging;
mod output;

use commands::{
    config::ConfigCommand, plan::PlanCommand, run::RunCommand, status::StatusCommand,
    sync::SyncCommand,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "yadsync",
    version,
    about = "Mirror a local folder into a Yandex Disk folder"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sync periodically until interrupted
    Run(RunCommand),
    /// Run a single sync cycle
    Sync(SyncCommand),
    /// Show what the next cycle would upload and delete
    Plan(PlanCommand),
    /// Show remote folder and inventory status
    Status(StatusCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::resolve(cli.config.as_deref())?;

    // Config inspection stays on the console only.
    let log_file = match cli.command {
        Commands::Config(_) => None,
        _ => Some(config.logging.file.as_path()),
    };
    logging::init(&config.logging.level, cli.verbose, log_file);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Run(cmd) => cmd.execute(&config, format).await,
        Commands::Sync(cmd) => cmd.execute(&config, format).await,
        Commands::Plan(cmd) => cmd.execute(&config, format).await,
        Commands::Status(cmd) => cmd.execute(&config, format).await,
        Commands::Config(cmd) => cmd.execute(&config, cli.config.as_deref(), format).await,
    }
}
