// src/tracking/sampler.rs
use super::{lock, SessionAccumulator};
use crate::detection::FocusProbe;
use crate::errors::{AppError, AppResult};
use crate::persistence::LogStore;
use crate::report::UsageReport;
use crate::types::{ActivityLog, OpenInterval, TrackingPhase};
use crate::utils::today;
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Process-wide tracker: one accumulator, one probe, at most one sampling
/// thread.
///
/// `start` and `stop` are serialized against each other; every read or
/// mutation of tracking state goes through the accumulator's lock, and the
/// probe runs outside that lock.
pub struct Tracker {
    state: Arc<Mutex<SessionAccumulator>>,
    probe: Arc<dyn FocusProbe>,
    interval: Duration,
    running: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Tracker {
    pub fn new(probe: Arc<dyn FocusProbe>, store: LogStore, interval: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionAccumulator::new(store))),
            probe,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    /// Begins a tracking session. Returns `Ok(false)` if one is already
    /// running; nothing changes in that case.
    pub fn start(&self) -> AppResult<bool> {
        let mut worker = lock(&self.worker);
        {
            let mut state = lock(&self.state);
            if !state.start() {
                debug!("start() while {}; ignoring.", state.phase());
                return Ok(false);
            }
        }

        self.running.store(true, Ordering::SeqCst);
        let state = Arc::clone(&self.state);
        let probe = Arc::clone(&self.probe);
        let running = Arc::clone(&self.running);
        let interval = self.interval;

        let spawned = thread::Builder::new()
            .name("focus-sampler".to_string())
            .spawn(move || sampling_loop(&state, probe.as_ref(), &running, interval));

        match spawned {
            Ok(handle) => {
                *worker = Some(handle);
                info!("Tracking started (sampling every {:?}).", self.interval);
                Ok(true)
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                lock(&self.state).stop(Local::now());
                Err(AppError::Spawn(e))
            }
        }
    }

    /// Ends the session: waits for the in-flight tick, then closes and
    /// persists the open interval. Returns `false` if nothing was running.
    ///
    /// Worst-case latency is one probe call; the inter-tick sleep is cut
    /// short.
    pub fn stop(&self) -> bool {
        let mut worker = lock(&self.worker);
        let Some(handle) = worker.take() else {
            debug!("stop() while not tracking; ignoring.");
            return false;
        };

        self.running.store(false, Ordering::SeqCst);
        handle.thread().unpark();
        if handle.join().is_err() {
            warn!("Sampling thread panicked; closing session anyway.");
        }

        let mut state = lock(&self.state);
        debug!("Closing session ({}).", state.phase());
        let closed = state.stop(Local::now());
        match closed {
            Some(interval) => info!(
                "Tracking stopped; final interval '{}' ({}s).",
                interval.app_name, interval.duration
            ),
            None => info!("Tracking stopped; no interval was open."),
        }
        true
    }

    pub fn is_tracking(&self) -> bool {
        lock(&self.state).is_tracking()
    }

    pub fn phase(&self) -> TrackingPhase {
        lock(&self.state).phase()
    }

    pub fn current_interval(&self) -> Option<OpenInterval> {
        lock(&self.state).current_interval().cloned()
    }

    pub fn snapshot(&self) -> ActivityLog {
        lock(&self.state).log().clone()
    }

    /// Usage for `day`, or today in local time.
    pub fn get_report(&self, day: Option<NaiveDate>) -> UsageReport {
        let day = day.unwrap_or_else(today);
        lock(&self.state).report(day)
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        // Dropping a live tracker still closes and persists the open interval.
        self.stop();
    }
}

fn sampling_loop(
    state: &Mutex<SessionAccumulator>,
    probe: &dyn FocusProbe,
    running: &AtomicBool,
    interval: Duration,
) {
    debug!("Sampling loop started.");
    while running.load(Ordering::SeqCst) {
        let tick_start = Instant::now();

        let outcome = probe.probe();
        let now = Local::now();
        lock(state).observe(&outcome, now);

        let deadline = tick_start + interval;
        while running.load(Ordering::SeqCst) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            thread::park_timeout(remaining);
        }
    }
    debug!("Sampling loop exited.");
}
