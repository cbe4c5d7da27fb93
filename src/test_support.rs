//! Fakes and fixtures shared by unit tests.

use crate::detection::FocusProbe;
use crate::errors::{AppError, AppResult, ProbeError};
use crate::persistence::{KeyValueStore, LogStore};
use crate::types::{ActivityInterval, OpenInterval, FocusSample, ProbeOutcome};
use chrono::{DateTime, Local, TimeZone};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A fixed local timestamp on 2024-03-15.
pub fn at(hour: u32, min: u32, sec: u32) -> DateTime<Local> {
    on(2024, 3, 15, hour, min, sec)
}

pub fn on(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(year, month, day, hour, min, sec)
        .earliest()
        .unwrap()
}

pub fn interval(
    app: &str,
    label: &str,
    start: DateTime<Local>,
    end: DateTime<Local>,
) -> ActivityInterval {
    OpenInterval {
        sample: FocusSample::new(app, label),
        start_time: start,
    }
    .close(end)
}

pub fn unavailable() -> ProbeOutcome {
    ProbeOutcome::Unavailable(ProbeError::Unavailable("screen locked".to_string()))
}

/// In-memory store; clones share contents so tests can inspect writes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    writes: Arc<AtomicUsize>,
    fail_reads: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn log_store(&self, key: &str) -> LogStore {
        LogStore::new(Box::new(self.clone()), key)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::DataDir("read refused".to_string()));
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> AppResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().unwrap().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Replays a script of outcomes, then repeats the last one forever.
pub struct ScriptedProbe {
    script: Mutex<VecDeque<ProbeOutcome>>,
    last: Mutex<ProbeOutcome>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new(script: Vec<ProbeOutcome>) -> Self {
        Self::with_delay(script, Duration::ZERO)
    }

    pub fn with_delay(script: Vec<ProbeOutcome>, delay: Duration) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(unavailable()),
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FocusProbe for ScriptedProbe {
    fn probe(&self) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            *last = next;
        }
        last.clone()
    }
}
