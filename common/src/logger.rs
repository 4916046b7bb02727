use std::path::Path;

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_DIRECTIVE: &str = "monitor=info";

/// Builds the filter from `log_level`, an `EnvFilter` directive such as
/// `monitor=debug,db=info`. Invalid directives fall back to the default.
pub fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs the global subscriber: a daily rolling file under `log_dir`, plus
/// stdout when `log_to_stdout` is set.
///
/// Keep the returned guard alive until shutdown so buffered lines get flushed.
pub fn init_logger(
    log_dir: &Path,
    log_file: &str,
    log_level: &str,
    log_to_stdout: bool,
) -> WorkerGuard {
    std::fs::create_dir_all(log_dir).ok();

    let file_appender = rolling::daily(log_dir, log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = log_to_stdout.then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}
