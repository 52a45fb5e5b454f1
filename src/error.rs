//! Error types for microsync
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::BuildError;

/// Result type alias for microsync operations
pub type MicrosyncResult<T> = Result<T, MicrosyncError>;

/// Main error type for microsync operations
#[derive(Error, Debug)]
pub enum MicrosyncError {
    /// Debounce timeout is zero, negative or not a number
    #[error("invalid debounce timeout '{value}': must be a positive number of seconds")]
    InvalidTimeout { value: String },

    /// A required setting was not provided by CLI, env or config file
    #[error(
        "missing required setting '{key}' (pass it on the command line or set it in microsync.toml)"
    )]
    MissingSetting { key: &'static str },

    /// Watch root does not exist or is not a directory
    #[error("watch root not found: {path}")]
    WatchRootNotFound { path: PathBuf },

    /// A setting has a value we cannot use
    #[error("invalid value for '{key}': {message}")]
    InvalidSetting { key: &'static str, message: String },

    /// Config file could not be parsed
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// The filesystem watcher could not be created or attached
    #[error("file watcher error: {0}")]
    Watcher(String),

    /// A build failed and the orchestrator is configured to halt on failure
    #[error("build failed: {0}")]
    BuildFailed(#[from] BuildError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
