//! CLI argument definitions and dispatch

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log format options
#[derive(Debug, Clone, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

/// Log level options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages
    Warn,
    /// Informational messages and above
    Info,
    /// Debug messages and above
    Debug,
    /// All messages including trace
    Trace,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Run benchmark environments on remote or local hosts
#[derive(Debug, Parser)]
#[command(
    name = "rembench",
    version,
    about = "Drive the setup/run/teardown lifecycle of benchmark environments"
)]
pub struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Log level filter (overrides REMBENCH_LOG)
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate an environment definition without running anything
    Validate {
        /// Path to the environment config file (JSONC)
        #[arg(long)]
        config: PathBuf,
    },
    /// Run an environment's full lifecycle: setup, run, teardown
    Run {
        /// Path to the environment config file (JSONC)
        #[arg(long)]
        config: PathBuf,

        /// Tunable assignment (format: name=value, can be repeated)
        #[arg(long = "tunable", action = clap::ArgAction::Append)]
        tunables: Vec<String>,

        /// Path to a global config overlay (JSON object)
        #[arg(long)]
        globals: Option<PathBuf>,

        /// Deadline in seconds for each script or host operation
        #[arg(long, default_value_t = 300)]
        timeout_secs: u64,
    },
}

impl Cli {
    /// Initialize logging and dispatch to the selected subcommand.
    pub fn dispatch(self) -> Result<()> {
        if let Some(level) = self.log_level {
            std::env::set_var("REMBENCH_LOG", level.as_filter());
        }
        let format = self.log_format.as_ref().map(|f| match f {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        });
        rembench_core::logging::init(format)?;

        match self.command {
            Commands::Validate { config } => crate::commands::validate::execute(&config),
            Commands::Run {
                config,
                tunables,
                globals,
                timeout_secs,
            } => crate::commands::run::execute(crate::commands::run::RunArgs {
                config,
                tunables,
                globals,
                timeout_secs,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_args() {
        let cli = Cli::parse_from([
            "rembench",
            "run",
            "--config",
            "env.jsonc",
            "--tunable",
            "threads=4",
            "--tunable",
            "mode=fast",
            "--timeout-secs",
            "30",
        ]);
        match cli.command {
            Commands::Run {
                config,
                tunables,
                timeout_secs,
                globals,
            } => {
                assert_eq!(config, PathBuf::from("env.jsonc"));
                assert_eq!(tunables, vec!["threads=4", "mode=fast"]);
                assert_eq!(timeout_secs, 30);
                assert!(globals.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
