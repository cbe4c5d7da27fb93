// src/persistence.rs
use crate::config::{AppConfig, FILE_STORE_EXTENSION};
use crate::errors::{AppError, AppResult};
use crate::types::ActivityLog;
use chrono::Utc;
use clap::ValueEnum;
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Byte-level storage the activity log is written into.
pub trait KeyValueStore: Send {
    /// Returns `Ok(None)` when nothing has been stored under `key`.
    fn read(&self, key: &str) -> AppResult<Option<Vec<u8>>>;
    fn write(&self, key: &str, bytes: &[u8]) -> AppResult<()>;
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    /// One JSON file per log key in the data directory
    #[default]
    #[value(name = "file")]
    File,
    /// A single SQLite database in the data directory
    #[value(name = "sqlite")]
    Sqlite,
}

pub fn open_store(config: &AppConfig) -> AppResult<Box<dyn KeyValueStore>> {
    match config.storage {
        StorageKind::File => Ok(Box::new(FileStore::open(&config.data_dir)?)),
        StorageKind::Sqlite => Ok(Box::new(SqliteStore::open(&config.database_path())?)),
    }
}

fn ensure_dir(dir: &Path) -> AppResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| AppError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

// --- File Store ---

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: &Path) -> AppResult<Self> {
        ensure_dir(dir)?;
        Ok(Self { dir: dir.to_path_buf() })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{FILE_STORE_EXTENSION}"))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(AppError::Io { path, source }),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> AppResult<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension(format!("{FILE_STORE_EXTENSION}.tmp"));
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| AppError::Io { path, source }
        };

        // Write the whole snapshot next to the target, then swap it in.
        let mut file = fs::File::create(&tmp_path).map_err(io_err(&tmp_path))?;
        file.write_all(bytes).map_err(io_err(&tmp_path))?;
        file.sync_all().map_err(io_err(&tmp_path))?;
        drop(file);
        fs::rename(&tmp_path, &path).map_err(io_err(&path))?;
        Ok(())
    }
}

// --- SQLite Store ---

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let mut conn = Connection::open(path)?;
        initialize_db(&mut conn)?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> AppResult<Self> {
        let mut conn = Connection::open_in_memory()?;
        initialize_db(&mut conn)?;
        Ok(Self { conn })
    }
}

fn initialize_db(conn: &mut Connection) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value BLOB NOT NULL,
            updated_at INTEGER NOT NULL -- Unix timestamp (seconds)
        )",
        [],
    )?;
    tx.commit()
}

impl KeyValueStore for SqliteStore {
    fn read(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| {
                row.get::<_, Vec<u8>>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = excluded.updated_at",
            params![key, bytes, Utc::now().timestamp()],
        )?;
        Ok(())
    }
}

// --- Log Persistence Bridge ---

/// Loads and saves the activity log under one well-known key.
pub struct LogStore {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl LogStore {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Missing, unreadable or corrupt state all load as an empty log.
    pub fn load(&self) -> ActivityLog {
        let bytes = match self.store.read(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("No stored activity log under '{}'. Starting fresh.", self.key);
                return ActivityLog::new();
            }
            Err(e) => {
                warn!("Could not read activity log '{}': {}. Starting fresh.", self.key, e);
                return ActivityLog::new();
            }
        };

        match serde_json::from_slice::<ActivityLog>(&bytes) {
            Ok(log) => {
                debug!("Loaded {} interval(s) from '{}'.", log.len(), self.key);
                log
            }
            Err(e) => {
                warn!("Stored activity log '{}' is corrupt: {}. Starting fresh.", self.key, e);
                ActivityLog::new()
            }
        }
    }

    pub fn save(&self, log: &ActivityLog) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(log)?;
        self.store.write(&self.key, &bytes)?;
        debug!("Saved {} interval(s) to '{}'.", log.len(), self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, interval, MemoryStore};
    use tempfile::tempdir;

    fn sample_log() -> ActivityLog {
        vec![
            interval("VSCode", "VSCode - main.py", at(9, 0, 0), at(9, 0, 2)),
            interval("Chrome", "Chrome - youtube.com", at(9, 0, 2), at(9, 0, 5)),
            interval("VSCode", "VSCode - main.py", at(9, 0, 5), at(9, 1, 0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn file_store_round_trip_preserves_order_and_fields() {
        let dir = tempdir().unwrap();
        let store = LogStore::new(Box::new(FileStore::open(dir.path()).unwrap()), "activity_log");
        let log = sample_log();

        store.save(&log).unwrap();

        assert_eq!(store.load(), log);
        assert!(dir.path().join("activity_log.json").exists());
        assert!(!dir.path().join("activity_log.json.tmp").exists());
    }

    #[test]
    fn sqlite_store_round_trip_and_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("db.sqlite");
        let store = LogStore::new(Box::new(SqliteStore::open(&path).unwrap()), "device-1");

        store.save(&sample_log()).unwrap();
        let shorter: ActivityLog = sample_log().intervals()[..1].iter().cloned().collect();
        store.save(&shorter).unwrap();

        assert_eq!(store.load(), shorter);
    }

    #[test]
    fn missing_key_loads_empty() {
        let store = LogStore::new(Box::new(SqliteStore::open_in_memory().unwrap()), "nothing-here");
        assert!(store.load().is_empty());

        let dir = tempdir().unwrap();
        let store = LogStore::new(Box::new(FileStore::open(dir.path()).unwrap()), "nothing-here");
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_state_loads_empty() {
        let memory = MemoryStore::default();
        memory.write("activity_log", b"{ not json").unwrap();
        let store = LogStore::new(Box::new(memory), "activity_log");
        assert!(store.load().is_empty());
    }

    #[test]
    fn unreadable_state_loads_empty() {
        let memory = MemoryStore::default();
        memory.fail_reads();
        let store = LogStore::new(Box::new(memory), "activity_log");
        assert!(store.load().is_empty());
    }

    #[test]
    fn keys_are_isolated() {
        let dir = tempdir().unwrap();
        let file_store = FileStore::open(dir.path()).unwrap();
        file_store.write("a", b"[]").unwrap();
        assert_eq!(file_store.read("a").unwrap(), Some(b"[]".to_vec()));
        assert_eq!(file_store.read("b").unwrap(), None);
    }
}
