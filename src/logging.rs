// src/logging.rs

//! `tracing` subscriber setup.
//!
//! `--log-level` wins when given. Otherwise `PERTRACK_LOG` is read as an
//! `EnvFilter` directive string, so `PERTRACK_LOG=pertrack::dag=debug` turns
//! on rule tracing for the engines alone. Unset or unparseable means `info`.
//!
//! Logs go to STDERR; command results go to STDOUT.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

const ENV_VAR: &str = "PERTRACK_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = resolve_filter(cli_level, std::env::var(ENV_VAR).ok());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("initialising logging: {e}"))?;

    Ok(())
}

fn resolve_filter(cli_level: Option<LogLevel>, env: Option<String>) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return EnvFilter::new(directive_for(lvl));
    }
    env.and_then(|raw| match EnvFilter::try_new(raw.trim()) {
        Ok(filter) => Some(filter),
        Err(e) => {
            eprintln!("pertrack: ignoring {ENV_VAR}={raw:?}: {e}");
            None
        }
    })
    .unwrap_or_else(|| EnvFilter::new("info"))
}

fn directive_for(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
