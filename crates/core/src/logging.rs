//! Log setup shared by the genscope binaries.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Overrides the log directory, mainly for tests and sandboxed runs.
pub const LOG_DIR_ENV: &str = "GENSCOPE_LOG_DIR";

/// `$GENSCOPE_LOG_DIR`, else `~/.genscope/logs`.
pub fn log_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(LOG_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".genscope")
        .join("logs")
}

/// Installs the global subscriber: a daily file per `component` plus an
/// optional stderr mirror. The level comes from `RUST_LOG`, default `info`.
///
/// Returns the file writer's guard; logs are flushed when it is dropped.
/// Without a writable log directory only the stderr layer is installed and
/// `None` is returned.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let dir = log_dir();
    let (file_layer, guard, failure) = match std::fs::create_dir_all(&dir) {
        Ok(()) => {
            // One file per day: <dir>/cli.2026-01-21
            let appender = tracing_appender::rolling::daily(&dir, component);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    // A subscriber installed earlier in the process (tests, embedding) stays.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();

    if let Some(e) = failure {
        tracing::warn!("File logging disabled, cannot create {}: {}", dir.display(), e);
    }
    guard
}
