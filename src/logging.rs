//! Logging setup.
//!
//! The terminal belongs to the UI, so events go to `soundpad.log` in the
//! data directory. Filtering comes from `RUST_LOG` when set, else from the
//! configured level.

use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_FILE_NAME: &str = "soundpad.log";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to prepare log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to install global tracing subscriber: {0}")]
    SetGlobal(String),
}

/// Install a global subscriber appending to `dir/soundpad.log`.
///
/// Returns the log file path. Callers degrade to no logging on error.
pub fn init(dir: &Path, level: &str) -> Result<PathBuf, LoggingError> {
    fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(LOG_FILE_NAME);
    let file = open_log_file(&path)?;

    fmt()
        .with_env_filter(build_env_filter(level))
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| LoggingError::SetGlobal(e.to_string()))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(path)
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::OpenFile {
            path: path.to_path_buf(),
            source,
        })
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
