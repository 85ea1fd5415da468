//! Tracing setup.
//!
//! The terminal belongs to the feed UI, so diagnostics are written to a log
//! file instead (`tail -f` it from another terminal). Every line appended to
//! the in-app exposure log is mirrored at debug level under the `exposure`
//! target, so `RUST_LOG=exposure=debug` reproduces the overlay in the file.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVE: &str = "info,exposure=debug";

/// Why the file subscriber could not be installed.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The directory holding the log file could not be created.
    #[error("Cannot create log directory {dir:?}: {source}")]
    CreateDir {
        /// Directory that was being created.
        dir: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configured path does not end in a UTF-8 file name.
    #[error("Log path {0:?} does not name a file")]
    NoFileName(PathBuf),

    /// A global subscriber is already installed in this process.
    #[error("A tracing subscriber is already installed")]
    SubscriberAlreadySet,
}

/// `RUST_LOG` when set and valid, else [`DEFAULT_DIRECTIVE`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Split a log path into the directory to create and the file name.
///
/// A bare file name logs into the working directory.
fn split_log_path(log_path: &Path) -> Result<(&Path, &str), LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::NoFileName(log_path.to_path_buf()))?;
    let dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok((dir, file_name))
}

/// Install the global subscriber, appending to `log_path`.
///
/// # Errors
///
/// Returns [`LoggingError`] if the path has no file name, its directory
/// cannot be created, or a subscriber is already installed.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    let (dir, file_name) = split_log_path(log_path)?;

    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(tracing_appender::rolling::never(dir, file_name))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
