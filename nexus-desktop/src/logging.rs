//! File logging. The terminal owns stdout/stderr while the UI runs, so
//! events only go to a daily-rotated file under the logs directory.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV_VAR: &str = "NEXUS_LOG";
const LOG_FILE_NAME: &str = "nexus-desktop.log";
const FALLBACK_DIRECTIVE: &str = "info";

/// Picks the filter directive: `NEXUS_LOG` wins over the configured level.
pub fn filter_directive(env: Option<String>, configured: &str) -> String {
    match env {
        Some(value) if !value.trim().is_empty() => value,
        _ if !configured.trim().is_empty() => configured.to_string(),
        _ => FALLBACK_DIRECTIVE.to_string(),
    }
}

fn log_filter(configured: &str) -> EnvFilter {
    let directive = filter_directive(std::env::var(LOG_ENV_VAR).ok(), configured);
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE))
}

/// Installs the global subscriber. Keep the guard alive until exit or
/// buffered lines are lost.
pub fn init(logs_dir: &Path, configured: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(log_filter(configured))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        tracing::error!(location = %location, "Panic: {}", info);
    }));

    Ok(guard)
}
