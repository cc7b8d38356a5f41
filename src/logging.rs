use crate::error::{GrafanaError, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Daily-rotated log file under `dir`; the directory is created if missing.
fn file_appender(dir: &Path) -> Result<RollingFileAppender> {
    fs::create_dir_all(dir)?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("grafana-tool.log")
        .build(dir)
        .map_err(|e| GrafanaError::Logging(format!("{} ({})", e, dir.display())))
}

/// Initializes logging to stderr, plus a daily-rotated JSON log file when
/// `log_dir` is given. Keep the returned guard alive so the file is flushed on exit.
pub fn init_logging(log_dir: Option<&Path>, verbose: bool) -> Result<Option<WorkerGuard>> {
    let level = if verbose { "debug" } else { "info" };
    let directive: Directive = format!("grafana_tool={}", level)
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender(dir)?);
            (
                Some(fmt::layer().json().with_writer(non_blocking_writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    // stdout is reserved for command output
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(directive))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| GrafanaError::Logging(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unusable_log_dir_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = init_logging(Some(&file.path().join("logs")), false);
        assert!(matches!(result, Err(GrafanaError::Io(_))));
    }

    #[test]
    fn test_file_appender_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        file_appender(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
