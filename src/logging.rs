//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log filter:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `--verbose` (debug)
//! 3. `TASKHEAP_LOG` environment variable (e.g. "info", "taskheap=debug")
//! 4. `log_level` from the config file
//! 5. default to `warn`
//!
//! Logs go to stderr so stdout stays clean for command output.

use anyhow::Result;
use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the log filter
pub const LOG_ENV: &str = "TASKHEAP_LOG";

/// Log level as exposed on the CLI
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Picks the filter directive according to the priority above
pub fn resolve_filter(
    cli_level: Option<LogLevel>,
    verbose: bool,
    env_value: Option<String>,
    config_level: Option<&str>,
) -> String {
    if let Some(level) = cli_level {
        return level.as_str().to_string();
    }
    if verbose {
        return LogLevel::Debug.as_str().to_string();
    }
    env_value
        .filter(|s| !s.trim().is_empty())
        .or_else(|| config_level.map(str::to_string))
        .unwrap_or_else(|| LogLevel::Warn.as_str().to_string())
}

/// Initialise the global logging subscriber.
///
/// Call once at startup; later calls are ignored.
pub fn init_logging(
    cli_level: Option<LogLevel>,
    verbose: bool,
    config_level: Option<&str>,
) -> Result<()> {
    let directive = resolve_filter(
        cli_level,
        verbose,
        std::env::var(LOG_ENV).ok(),
        config_level,
    );
    let filter = EnvFilter::try_new(&directive)
        .or_else(|_| EnvFilter::try_new(LogLevel::Warn.as_str()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    Ok(())
}
