// src/errors.rs
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Data directory error: {0}")]
    DataDir(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error accessing path '{path}': {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to spawn sampling thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Failed to set Ctrl-C handler: {0}")]
    CtrlC(#[from] ctrlc::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// Failures inside a focus probe. These never leave the probe; they are
/// folded into `ProbeOutcome::Unavailable`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("focus information unavailable: {0}")]
    Unavailable(String),

    #[error("focus query timed out after {0:?}")]
    Timeout(Duration),
}
