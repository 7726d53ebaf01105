//! Tracing subscriber setup shared by the binaries.

use std::path::Path;

use custreg_core::config::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_PREFIX: &str = "custreg.log";

/// Builds the filter: `RUST_LOG` wins, then the configured level, then `info`.
pub fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber.
///
/// Logs go to stderr, or to a daily-rolling file under `log_dir` when
/// `log_to_file` is set. The returned guard must be held for the lifetime of
/// the process so buffered file output is flushed. Calling this twice is
/// harmless; the second call leaves the first subscriber in place.
pub fn init_logging(settings: &LoggingSettings, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = env_filter(settings);

    match log_dir.filter(|_| settings.log_to_file) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let result = tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .try_init();
            result.ok().map(|_| guard)
        }
        None => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .try_init();
            None
        }
    }
}
