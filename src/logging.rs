// src/logging.rs - Process-wide logging setup

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Install the global tracing subscriber: a console sink, plus a
/// daily-rotating file sink when a log file is configured. The returned
/// guard must be held for the life of the process so buffered file output
/// is flushed on exit.
///
/// `RUST_LOG` overrides the configured console level when set.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let console_level: LevelFilter = config
        .console_level
        .parse()
        .with_context(|| format!("Invalid console log level '{}'", config.console_level))?;
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.to_string()));

    let console_layer = fmt::layer()
        .with_ansi(config.ansi)
        .with_filter(console_filter);

    match &config.log_file {
        Some(log_file) => {
            let file_filter: LevelFilter = config
                .file_level
                .parse()
                .with_context(|| format!("Invalid file log level '{}'", config.file_level))?;

            let path = Path::new(log_file);
            let directory = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file path '{}' has no file name", log_file))?;

            let (writer, guard) = tracing_appender::non_blocking(rolling::daily(
                directory, file_name,
            ));
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(file_filter);

            tracing_subscriber::registry()
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(console_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;

            Ok(None)
        }
    }
}
