use crate::error::ConfigError;
use crate::settings::LoggerSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. When a log file is
/// configured the returned guard must be kept alive until shutdown, otherwise
/// buffered lines are lost.
pub fn init_tracing(settings: &LoggerSettings) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(settings.level.into()).into())
        .from_env_lossy();

    match &settings.file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(|parent| parent.to_path_buf())
                .unwrap_or_else(|| ".".into());
            let file_name = path.file_name().ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "logger.file '{}' does not name a file",
                    path.display()
                ))
            })?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| ConfigError::LoggingError(e.to_string()))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| ConfigError::LoggingError(e.to_string()))?;
            Ok(None)
        }
    }
}
