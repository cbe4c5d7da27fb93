// src/config.rs

use crate::errors::{AppError, AppResult};
use crate::persistence::StorageKind;
use std::path::PathBuf;
use std::time::Duration;

// === Application Info ===
pub const APP_NAME: &str = "focus_tracker";
// Subdirectory created under the platform data dir.
pub const DATA_DIR_NAME: &str = "FocusTracker";

// === Tracker Settings ===
// How often the focused window is sampled.
pub const SAMPLE_INTERVAL_MS: u64 = 1000;
// Upper bound for the browser tab lookup (osascript) on macOS.
pub const BROWSER_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

// === Persistence Settings ===
pub const DEFAULT_LOG_KEY: &str = "activity_log";
pub const DATABASE_FILENAME: &str = "focus_tracker.sqlite";
pub const FILE_STORE_EXTENSION: &str = "json";

/// Resolved runtime settings, built once at startup from the constants above
/// and the global CLI flags.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub data_dir: PathBuf,
    pub storage: StorageKind,
    pub log_key: String,
    pub sample_interval: Duration,
    pub probe_timeout: Duration,
}

impl AppConfig {
    pub fn resolve(
        data_dir: Option<PathBuf>,
        storage: StorageKind,
        log_key: Option<String>,
        interval_ms: Option<u64>,
    ) -> AppResult<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        let log_key = log_key.unwrap_or_else(|| DEFAULT_LOG_KEY.to_string());
        if log_key.trim().is_empty() {
            return Err(AppError::Config("log key cannot be empty".to_string()));
        }
        // The key doubles as a file name for the file store.
        if log_key.contains(['/', '\\']) {
            return Err(AppError::Config(format!(
                "log key '{log_key}' must not contain path separators"
            )));
        }

        let interval_ms = interval_ms.unwrap_or(SAMPLE_INTERVAL_MS);
        if interval_ms == 0 {
            return Err(AppError::Config("sampling interval must be greater than zero".to_string()));
        }

        Ok(Self {
            app_name: APP_NAME.to_string(),
            data_dir,
            storage,
            log_key,
            sample_interval: Duration::from_millis(interval_ms),
            probe_timeout: BROWSER_QUERY_TIMEOUT,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILENAME)
    }
}

fn default_data_dir() -> AppResult<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .ok_or_else(|| AppError::DataDir("could not find user data directory".to_string()))
}
