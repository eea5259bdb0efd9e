//! Logging for the player.
//!
//! Events go to stdout and to a daily-rolled file under `.minuet/logs`.
//! Startup cleans up rolled files beyond a fixed count so the directory
//! stays small.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use thiserror::Error;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs;

/// Prefix of the rolled log files; the roller appends the date.
const LOG_FILE_PREFIX: &str = "minuet.log";
/// Rolled files kept after startup cleanup.
const MAX_ROLLED_FILES: usize = 7;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Errors returned by [`init`]; callers are expected to degrade, not abort.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory could not be resolved or created.
    #[error(transparent)]
    Dirs(#[from] app_dirs::AppDirError),
    /// Old rolled files could not be listed or removed.
    #[error("Failed to clean up log files under {path}: {source}")]
    Cleanup {
        /// Directory or file the cleanup failed on.
        path: PathBuf,
        /// Underlying io error.
        source: std::io::Error,
    },
    /// Another global subscriber is already installed.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install the global subscriber: stdout plus a daily-rolled log file.
///
/// Repeat calls are no-ops. `RUST_LOG` overrides the default `info` filter.
pub fn init() -> Result<(), LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(());
    }

    let log_dir = app_dirs::logs_dir()?;
    prune_rolled_logs(&log_dir, MAX_ROLLED_FILES)?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(rolling::daily(&log_dir, LOG_FILE_PREFIX));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer));
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = LOG_GUARD.set(guard);
    Ok(())
}

/// Delete the oldest rolled files beyond `keep`.
///
/// The roller suffixes names with the date, so lexicographic order is
/// chronological. Files without the log prefix are left alone.
fn prune_rolled_logs(dir: &Path, keep: usize) -> Result<(), LoggingError> {
    let entries = fs::read_dir(dir).map_err(|source| LoggingError::Cleanup {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut rolled: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_rolled_log(path))
        .collect();
    rolled.sort();
    let excess = rolled.len().saturating_sub(keep);
    for path in rolled.into_iter().take(excess) {
        fs::remove_file(&path).map_err(|source| LoggingError::Cleanup { path, source })?;
    }
    Ok(())
}

fn is_rolled_log(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX))
}
