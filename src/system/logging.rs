//! Logging system initialization
//!
//! Sets up tracing with a non-blocking writer. Logs go to stdout by
//! default; `LOG_FILE` switches to appending to a file instead.

use crate::config::Config;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber
///
/// Call once during startup, after the configuration has been loaded.
/// The returned guard must be kept alive for the duration of the program
/// so non-blocking log writes are flushed.
pub fn init_logging(config: &Config) -> tracing_appender::non_blocking::WorkerGuard {
    let writer: Box<dyn std::io::Write + Send + Sync> = match &config.log_file {
        Some(log_file) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .expect("Failed to open log file");
            Box::new(file)
        }
        None => Box::new(std::io::stdout()),
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = EnvFilter::new(config.log_level.clone());

    tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(config.log_file.is_none())
        .init();

    guard
}
