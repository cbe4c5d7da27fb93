use crate::errors::ProbeError;
use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

// --- Probe Data ---

/// What the focus probe saw on one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSample {
    pub app_name: String,
    /// Window title, or for a known browser the active tab's URL. Equal to
    /// `app_name` when nothing finer is available.
    pub window_label: String,
}

impl FocusSample {
    pub fn new(app_name: impl Into<String>, window_label: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            window_label: window_label.into(),
        }
    }
}

/// Result of a single probe call. Probes never fail past this boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Known(FocusSample),
    Unavailable(ProbeError),
}

impl ProbeOutcome {
    pub fn known(app_name: impl Into<String>, window_label: impl Into<String>) -> Self {
        ProbeOutcome::Known(FocusSample::new(app_name, window_label))
    }

    pub fn sample(&self) -> Option<&FocusSample> {
        match self {
            ProbeOutcome::Known(sample) => Some(sample),
            ProbeOutcome::Unavailable(_) => None,
        }
    }
}

impl From<Result<FocusSample, ProbeError>> for ProbeOutcome {
    fn from(result: Result<FocusSample, ProbeError>) -> Self {
        match result {
            Ok(sample) => ProbeOutcome::Known(sample),
            Err(e) => ProbeOutcome::Unavailable(e),
        }
    }
}

// --- Activity Records ---

/// The interval currently accruing time. Exactly one exists while a sample
/// has been seen in the running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenInterval {
    pub sample: FocusSample,
    pub start_time: DateTime<Local>,
}

impl OpenInterval {
    pub fn close(self, end_time: DateTime<Local>) -> ActivityInterval {
        // Truncated whole seconds; a clock stepping backwards yields zero.
        let duration = (end_time - self.start_time).num_seconds().max(0);
        ActivityInterval {
            app_name: self.sample.app_name,
            window_label: self.sample.window_label,
            start_time: self.start_time,
            end_time,
            duration,
        }
    }
}

/// A closed, immutable span during which one application/window stayed focused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityInterval {
    pub app_name: String,
    #[serde(rename = "window_title")]
    pub window_label: String,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    /// Whole seconds, `end_time - start_time`.
    pub duration: i64,
}

impl ActivityInterval {
    /// Grouping key used by reports and the text export.
    pub fn report_key(&self) -> String {
        format!("{}: {}", self.app_name, self.window_label)
    }
}

/// Append-only, insertion-ordered record of closed intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityLog {
    intervals: Vec<ActivityInterval>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, interval: ActivityInterval) {
        self.intervals.push(interval);
    }

    pub fn intervals(&self) -> &[ActivityInterval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn total_secs(&self) -> i64 {
        self.intervals.iter().map(|i| i.duration).sum()
    }
}

impl FromIterator<ActivityInterval> for ActivityLog {
    fn from_iter<T: IntoIterator<Item = ActivityInterval>>(iter: T) -> Self {
        Self {
            intervals: iter.into_iter().collect(),
        }
    }
}

// --- Tracking State ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingPhase {
    /// Not tracking.
    Idle,
    /// Tracking started, no known sample seen yet.
    AwaitingSample,
    /// Tracking with an open interval.
    Open,
}

impl fmt::Display for TrackingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingPhase::Idle => write!(f, "idle"),
            TrackingPhase::AwaitingSample => write!(f, "tracking (waiting for first sample)"),
            TrackingPhase::Open => write!(f, "tracking"),
        }
    }
}

// --- Enums for Control Flow ---

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationLevel {
    /// Aggregate usage time by application name only
    #[value(name = "app")]
    ByApplication,
    /// Show usage time for each application and window combination
    #[value(name = "detailed")]
    Detailed,
}

impl fmt::Display for AggregationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationLevel::ByApplication => write!(f, "By Application"),
            AggregationLevel::Detailed => write!(f, "Detailed (App + Window)"),
        }
    }
}
