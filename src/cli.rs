// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::{ActivityId, ActivityStatus};

/// Command-line arguments for `pertrack`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pertrack",
    version,
    about = "Track a project as a network of dependent activities.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Pertrack.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PERTRACK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create an empty project file.
    New {
        project: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        work_order: String,
        /// Planned start; defaults to now.
        #[arg(long, value_name = "TIMESTAMP")]
        start: Option<String>,
    },

    /// Print planned and estimated completion dates.
    Dates { project: PathBuf },

    /// Print the derived project status and each activity's status.
    Status { project: PathBuf },

    /// Change one activity's status.
    SetStatus {
        project: PathBuf,
        activity: ActivityId,
        /// pending, in_progress, completed, completed_with_errors, interrupted
        status: ActivityStatus,
        /// Save the updated project back to the file.
        #[arg(long)]
        write: bool,
    },

    /// Append a new activity.
    AddActivity {
        project: PathBuf,
        #[arg(long)]
        name: String,
        /// Defaults to `[config].default_duration_hours`.
        #[arg(long)]
        hours: Option<f64>,
        /// Dependency id (repeatable).
        #[arg(long = "after", value_name = "ID")]
        after: Vec<ActivityId>,
        /// Contingency successor id (repeatable).
        #[arg(long = "on-error", value_name = "ID")]
        on_error: Vec<ActivityId>,
        #[arg(long = "type", default_value_t = 1)]
        activity_type: u32,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Delete an activity and every reference to it.
    RemoveActivity {
        project: PathBuf,
        activity: ActivityId,
    },

    /// Validate a project file and report problems.
    Check { project: PathBuf },
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
