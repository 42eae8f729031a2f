//! Time-of-day utilities
//!
//! All show timing is expressed as milliseconds since local midnight, so cue
//! times line up with the wall clock the operators read. An interval whose end
//! is earlier than its start runs through midnight into the next day.

use chrono::{Local, Timelike};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Length of one day in milliseconds
pub const DAY_MS: i64 = 86_400_000;

/// Source of the current time of day
///
/// The engine never reads the system clock directly so that tests and
/// replays can drive it deterministically.
pub trait TimeSource: Send + Sync {
    /// Milliseconds since local midnight
    fn now(&self) -> i64;
}

/// Wall-clock time source backed by the local system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> i64 {
        millis_since_midnight(Local::now().time())
    }
}

/// Manually driven time source
///
/// Cloning shares the underlying time, so a test can keep one handle and hand
/// another to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Arc<AtomicI64>,
}

impl ManualTime {
    /// Create a manual clock starting at `start_ms` since midnight
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start_ms)),
        }
    }

    /// Jump to an absolute time of day
    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    /// Move forward by `delta_ms`, wrapping at midnight
    pub fn advance(&self, delta_ms: i64) {
        let next = (self.now.load(Ordering::SeqCst) + delta_ms).rem_euclid(DAY_MS);
        self.now.store(next, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Convert a wall-clock time to milliseconds since midnight
pub fn millis_since_midnight<T: Timelike>(time: T) -> i64 {
    // Leap seconds show up as nanosecond values >= 1e9; clamp them into the last second
    let millis = (time.nanosecond() / 1_000_000).min(999);
    i64::from(time.num_seconds_from_midnight()) * 1000 + i64::from(millis)
}

/// End of an interval, pushed into the next day when it wraps past midnight
pub fn day_adjusted_end(start: i64, end: i64) -> i64 {
    if end < start {
        end + DAY_MS
    } else {
        end
    }
}

/// Duration of an interval, accounting for midnight wraparound
pub fn span(start: i64, end: i64) -> i64 {
    day_adjusted_end(start, end) - start
}

/// Normalise `now` against an anchor taken earlier the same show day
///
/// If `now` reads earlier than `anchor` the wall clock has crossed midnight
/// since the anchor was taken.
pub fn unwrap_after(anchor: i64, now: i64) -> i64 {
    if now < anchor {
        now + DAY_MS
    } else {
        now
    }
}

/// Wrap an absolute millisecond value back into a single day
pub fn wrap_day(millis: i64) -> i64 {
    millis.rem_euclid(DAY_MS)
}

/// Convert milliseconds to fractional seconds for display payloads
pub fn millis_to_seconds(millis: i64) -> f64 {
    millis as f64 / 1000.0
}
