//! Backtester CLI application.

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level {
        cli::LogLevel::Trace => "trace",
        cli::LogLevel::Debug => "debug",
        cli::LogLevel::Info => "info",
        cli::LogLevel::Warn => "warn",
        cli::LogLevel::Error => "error",
    };
    logging::setup_logging(log_level, cli.json_logs);

    match cli.command {
        Commands::Demo(args) => cli::commands::demo::run(args),
        Commands::Params => cli::commands::params::run(),
    }
}
