//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "backtester")]
#[command(author, version, about = "Bar-by-bar trading strategy backtester")]
pub struct Cli {
    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a backtest over synthetic demo data
    Demo(commands::demo::DemoArgs),
    /// List recognized strategy parameters and their defaults
    Params,
}
