//! File logging setup.
//!
//! stdout belongs to the terminal UI, so log records go to a daily rolling
//! file through a non-blocking writer.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "work_backlog=info";
const LOG_FILE: &str = "wb.log";

/// Keeps the background writer alive. Dropping it flushes pending records.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

fn ensure_log_dir(preferred: &Path) -> Option<PathBuf> {
    std::fs::create_dir_all(preferred)
        .map(|_| preferred.to_path_buf())
        .or_else(|_| -> std::io::Result<PathBuf> {
            let dir = std::env::temp_dir().join("wb").join("logs");
            std::fs::create_dir_all(&dir)?;
            Ok(dir)
        })
        .ok()
}

/// Install the global subscriber. Returns `None` when logging cannot be set
/// up; the application runs without it.
pub fn init(log_dir: &Path) -> Option<LoggingGuard> {
    let log_dir = ensure_log_dir(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!(panic = %panic_info, "panic");
        previous(panic_info);
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard { _guard: guard })
}
