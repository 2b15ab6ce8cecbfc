//! File-backed `tracing` setup.
//!
//! The terminal belongs to the UI, so log lines go to a file instead of
//! stdout/stderr. `RUST_LOG` takes precedence over the configured level.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::{AppError, AppResult};

/// Installs the global subscriber. Returns the log file path, or `None` when
/// no writable location could be resolved.
pub fn init_logging(config: &LogConfig) -> AppResult<Option<PathBuf>> {
    let Some(path) = config.file.clone().or_else(default_log_path) else {
        return Ok(None);
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| {
            AppError::io_with_context(
                source,
                format!("failed to create log directory: {}", parent.display()),
            )
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| {
            AppError::io_with_context(source, format!("failed to open log: {}", path.display()))
        })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();

    Ok(Some(path))
}

pub fn default_log_path() -> Option<PathBuf> {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME")
        && !state.is_empty()
    {
        return Some(PathBuf::from(state).join("imf").join("imf.log"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("imf")
                .join("imf.log"),
        );
    }
    if let Some(appdata) = std::env::var_os("LOCALAPPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("imf").join("imf.log"));
    }
    None
}
