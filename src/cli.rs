// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `taskgraph`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskgraph",
    version,
    about = "Run a conditional task graph with bounded retries.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the graph description (JSON, optionally inside a ```json fence).
    #[arg(long, value_name = "PATH")]
    pub graph: String,

    /// Path to the settings file (TOML).
    ///
    /// Default: `Taskgraph.toml` in the current working directory, used only
    /// if it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Maximum attempts per task; overrides `[config].max_retries`.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_retries: Option<u32>,

    /// Force a task to fail without running it. Repeatable.
    #[arg(long = "fail", value_name = "ID")]
    pub fail: Vec<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKGRAPH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate the graph and print the execution order, but run nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the final statuses as a JSON object.
    #[arg(long)]
    pub json: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
