//! Structured logging setup using the `tracing` ecosystem.
//!
//! The client crates only emit `tracing` events; installing a subscriber is
//! left to the application. These helpers cover the common setups.

use std::path::Path;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::LvResult;

/// Initialize the global tracing subscriber with console and file output.
///
/// Sets up:
/// - Console output (stderr), compact
/// - File output with daily rotation in `log_dir`
/// - Level filtering via an `EnvFilter` directive
///
/// If a global subscriber is already installed the call leaves it in place.
pub fn init_logging(level: &str, log_dir: &Path, json_output: bool) -> LvResult<LogGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = rolling::daily(log_dir, "lovens.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();

    let installed = if json_output {
        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .is_ok()
    } else {
        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::info!("logging initialized at level={level}, dir={}", log_dir.display());
    }

    Ok(LogGuard { _guard: guard })
}

/// Initialize logging from a `LoggingConfig`.
///
/// Returns `None` when no log directory is configured; console logging is
/// installed in that case.
pub fn init_from_config(config: &LoggingConfig) -> LvResult<Option<LogGuard>> {
    if config.directory.is_empty() {
        init_console_logging(&config.level);
        return Ok(None);
    }
    init_logging(&config.level, Path::new(&config.directory), config.json_output).map(Some)
}

/// Guard that keeps the non-blocking log writer alive.
/// Drop this to flush and close the log file.
pub struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Initialize a minimal console-only logger for testing or simple tools.
pub fn init_console_logging(level: &str) {
    let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true).compact())
        .try_init();
}
