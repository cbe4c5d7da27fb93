// src/tracking/accumulator.rs
use super::detector::{detect, Transition};
use crate::persistence::LogStore;
use crate::report::UsageReport;
use crate::types::{ActivityInterval, ActivityLog, OpenInterval, ProbeOutcome, TrackingPhase};
use chrono::{DateTime, Local, NaiveDate};
use log::{debug, info, warn};

/// Owns the tracking flag, the open interval and the activity log.
///
/// Every closed interval is appended and written through to the store
/// immediately. A failed write is logged and tracking carries on; the next
/// closure writes the full log again.
pub struct SessionAccumulator {
    store: LogStore,
    log: ActivityLog,
    open: Option<OpenInterval>,
    tracking: bool,
}

impl SessionAccumulator {
    /// Resumes from whatever log the store already holds.
    pub fn new(store: LogStore) -> Self {
        let log = store.load();
        Self {
            store,
            log,
            open: None,
            tracking: false,
        }
    }

    pub fn phase(&self) -> TrackingPhase {
        match (self.tracking, &self.open) {
            (false, _) => TrackingPhase::Idle,
            (true, None) => TrackingPhase::AwaitingSample,
            (true, Some(_)) => TrackingPhase::Open,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn current_interval(&self) -> Option<&OpenInterval> {
        self.open.as_ref()
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    /// Returns false if tracking was already on.
    pub fn start(&mut self) -> bool {
        if self.tracking {
            return false;
        }
        self.open = None;
        self.tracking = true;
        true
    }

    /// Applies one probe result taken at `now`. Returns the interval this
    /// tick closed, if any.
    pub fn observe(
        &mut self,
        outcome: &ProbeOutcome,
        now: DateTime<Local>,
    ) -> Option<ActivityInterval> {
        if !self.tracking {
            return None;
        }

        match detect(self.open.as_ref().map(|o| &o.sample), outcome) {
            Transition::Ignore | Transition::Continue => None,
            Transition::Begin(sample) => {
                debug!("Opened interval for '{}' - '{}'", sample.app_name, sample.window_label);
                self.open = Some(OpenInterval {
                    sample: sample.clone(),
                    start_time: now,
                });
                None
            }
            Transition::Switch(sample) => {
                let next = OpenInterval {
                    sample: sample.clone(),
                    start_time: now,
                };
                let closed = self.close_open(now);
                debug!("Switched to '{}' - '{}'", next.sample.app_name, next.sample.window_label);
                self.open = Some(next);
                closed
            }
        }
    }

    /// Closes the open interval (if any) at `now` and leaves tracking.
    /// Returns `None` without touching anything when not tracking.
    pub fn stop(&mut self, now: DateTime<Local>) -> Option<ActivityInterval> {
        if !self.tracking {
            return None;
        }
        self.tracking = false;
        self.close_open(now)
    }

    pub fn report(&self, day: NaiveDate) -> UsageReport {
        UsageReport::for_day(&self.log, day)
    }

    fn close_open(&mut self, now: DateTime<Local>) -> Option<ActivityInterval> {
        let closed = self.open.take()?.close(now);
        info!(
            "Closed interval '{}' - '{}' ({}s)",
            closed.app_name, closed.window_label, closed.duration
        );
        self.log.append(closed.clone());
        if let Err(e) = self.store.save(&self.log) {
            warn!("Failed to persist activity log '{}': {}", self.store.key(), e);
        }
        Some(closed)
    }
}
