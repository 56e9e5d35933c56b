//! Tracing setup for the two front ends.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE: &str = "scriptoria.log";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("scriptoria").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Logging for TUI mode.
///
/// Everything goes to a daily rolling file; nothing is written to the
/// terminal while ratatui owns it. Keep the guard alive until exit so
/// buffered lines are flushed.
pub fn init_tui() -> WorkerGuard {
    let log_dir = log_dir();
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {e}");
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_filter(env_filter("info"));

    tracing_subscriber::registry().with(file_layer).init();

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    guard
}

/// Logging for headless mode: stderr, so stdout stays a clean protocol stream.
pub fn init_headless() {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(env_filter("warn"));

    tracing_subscriber::registry().with(stderr_layer).init();
}
