//! Tracing subscriber setup

use crate::cli::LogTarget;
use crate::error::{AppError, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` wins over `level`. For file targets the returned guard must
/// live until exit, or buffered lines are lost.
pub fn init(level: &str, target: &LogTarget, max_files: usize) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());

    match target {
        LogTarget::Stdout => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
            Ok(None)
        }
        LogTarget::File(path) => {
            let appender = rolling_appender(path, max_files)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Ok(Some(guard))
        }
    }
}

/// Daily-rotated appender keeping at most `max_files` files next to `path`
fn rolling_appender(path: &Path, max_files: usize) -> Result<RollingFileAppender> {
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory)?;

    let prefix = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("mpi3");
    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .max_log_files(max_files.max(1));
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        builder = builder.filename_suffix(extension);
    }

    builder
        .build(directory)
        .map_err(|e| AppError::Config(format!("Cannot open log file {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appender_creates_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("mpi3.log");
        rolling_appender(&path, 3).unwrap();
        assert!(dir.path().join("logs").is_dir());
    }
}
