//! Logging bootstrap for the prdiff binary.
//!
//! Events always go to stderr (or a file) so that stdout carries only
//! rendered output.

use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;

/// Default log level when none is given
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Parse a level name such as `info` or `DEBUG`
pub fn parse_level(level: &str) -> ConfigResult<LevelFilter> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| ConfigError::Logging(format!("unknown log level '{}'", level)))
}

/// Install the global subscriber.
///
/// With `log_file` set, events are written through a non-blocking file
/// appender and the returned guard must be kept alive until exit, otherwise
/// buffered events are lost.
pub fn init(level: &str, log_file: Option<&Path>) -> ConfigResult<Option<WorkerGuard>> {
    let filter = parse_level(level)?;

    match log_file {
        Some(path) => {
            let file_name = path.file_name().ok_or_else(|| {
                ConfigError::Logging(format!("invalid log file path '{}'", path.display()))
            })?;
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_max_level(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| ConfigError::Logging(e.to_string()))?;

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_max_level(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init()
                .map_err(|e| ConfigError::Logging(e.to_string()))?;

            Ok(None)
        }
    }
}
