// src/tracking/mod.rs
//! Turns a stream of focus samples into a time-accounted activity log.
//!
//! `detector` decides whether a sample starts a new interval, `accumulator`
//! owns the open interval and the log, and `sampler` drives both from a
//! background thread.

pub mod accumulator;
pub mod detector;
pub mod sampler;

pub use accumulator::SessionAccumulator;
pub use sampler::Tracker;

use std::sync::{Mutex, MutexGuard, PoisonError};

// Poisoning is ignored: every mutation is a single assignment or push, so
// the state is never left half-updated.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
