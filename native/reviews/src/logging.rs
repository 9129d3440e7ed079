use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global tracing subscriber.
///
/// Logs go to stderr, or to a daily rotated file in `log_dir` when given. The
/// returned guard must be kept alive for the file writer to flush.
pub fn setup_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).context("Failed to create logs directory")?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(10)
                .filename_prefix("reviews")
                .filename_suffix("log")
                .build(dir)
                .context("Failed to initialize file appender")?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .event_format(fmt::format().pretty())
                .with_writer(non_blocking)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to set global subscriber")?;
            Ok(Some(guard))
        }
        None => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to set global subscriber")?;
            Ok(None)
        }
    }
}
