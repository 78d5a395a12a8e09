use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const DEFAULT_FILTER: &str = "speedcard=info";

/// `<cache dir>/speedcard`, where the log file lives.
pub fn log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("speedcard"))
}

/// Build the filter: `--log-level` wins, then `RUST_LOG`, then the default.
pub fn build_filter(level: Option<&str>) -> EnvFilter {
    if let Some(level) = level
        && let Ok(filter) = EnvFilter::try_new(format!("speedcard={level}"))
    {
        return filter;
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Send tracing output to the log file. The terminal belongs to the UI, so
/// when no log directory is available nothing is installed.
///
/// The returned guard must live until shutdown so buffered lines are flushed.
pub fn init(level: Option<&str>) -> Option<WorkerGuard> {
    let dir = log_dir()?;
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("speedcard: logging disabled, cannot create {}: {e}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::never(&dir, "speedcard.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(file_layer)
        .init();

    tracing::info!(path = ?dir.join("speedcard.log"), "tracing initialized");
    Some(guard)
}
