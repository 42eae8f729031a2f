//! Wall-clock anchored countdown
//!
//! The clock knows nothing about cues: it counts a duration down from an
//! anchor time, can be paused and resumed without losing time, and raises a
//! one-shot flag when it reaches zero.
//!
//! `current` is always recomputed from the anchors and the time source, never
//! accumulated tick by tick, so a late or skipped tick cannot introduce drift:
//!
//! ```text
//! running: current = started_at + duration + paused_total                   - now
//! paused:  current = started_at + duration + paused_total + paused_interval - now
//! ```
//!
//! While paused, `paused_interval` grows exactly as fast as `now`, so `current`
//! stays frozen. On resume the interval is folded into `paused_total`.

use std::sync::Arc;

use showrun_common::events::{TimerSnapshot, TimerState};
use showrun_common::time::{millis_to_seconds, unwrap_after, wrap_day, TimeSource};
use tracing::debug;

/// Countdown primitive
pub struct Clock {
    time: Arc<dyn TimeSource>,
    state: TimerState,
    /// Whether a countdown is set up at all
    armed: bool,
    duration: i64,
    current: i64,
    secondary_timer: Option<i64>,
    /// Last time-of-day reading
    clock: i64,
    started_at: Option<i64>,
    paused_at: Option<i64>,
    paused_interval: i64,
    paused_total: i64,
    finished_at: Option<i64>,
    finished_flag: bool,
}

impl Clock {
    /// Create a stopped, empty clock reading from `time`
    pub fn new(time: Arc<dyn TimeSource>) -> Self {
        let clock = time.now();
        Self {
            time,
            state: TimerState::Stop,
            armed: false,
            duration: 0,
            current: 0,
            secondary_timer: None,
            clock,
            started_at: None,
            paused_at: None,
            paused_interval: 0,
            paused_total: 0,
            finished_at: None,
            finished_flag: false,
        }
    }

    /// Arm the clock with a fresh countdown, optionally starting it
    pub fn setup(&mut self, duration_ms: i64, auto_start: bool) {
        self.reset_anchors();
        self.state = TimerState::Stop;
        self.armed = true;
        self.duration = duration_ms.max(0);
        self.current = self.duration;
        self.secondary_timer = None;
        self.clock = self.time.now();

        if auto_start {
            self.start();
        }
    }

    /// Start or resume the countdown
    pub fn start(&mut self) {
        if matches!(self.state, TimerState::Start | TimerState::Roll) || !self.armed {
            return;
        }

        let now = self.time.now();
        match (self.started_at, self.paused_at) {
            (None, _) => self.started_at = Some(now),
            (Some(_), Some(paused_at)) => {
                self.paused_total += unwrap_after(paused_at, now) - paused_at;
                self.paused_interval = 0;
                self.paused_at = None;
            }
            (Some(_), None) => {}
        }

        self.state = TimerState::Start;
        self.update_at(now);
    }

    /// Freeze the countdown
    pub fn pause(&mut self) {
        if self.state != TimerState::Start {
            return;
        }

        let now = self.time.now();
        self.update_at(now);
        self.paused_at = Some(now);
        self.paused_interval = 0;
        self.state = TimerState::Pause;
    }

    /// Stop and clear the countdown entirely
    pub fn stop(&mut self) {
        self.reset_anchors();
        self.state = TimerState::Stop;
        self.armed = false;
        self.duration = 0;
        self.current = 0;
        self.secondary_timer = None;
        self.clock = self.time.now();
    }

    /// Enter roll state with nothing loaded (waiting for the next cue)
    pub fn roll_idle(&mut self) {
        self.stop();
        self.state = TimerState::Roll;
    }

    /// Enter roll state running a cue anchored at its time-of-day start,
    /// evaluated at time of day `now`
    pub fn roll(&mut self, started_at: i64, duration_ms: i64, now: i64) {
        self.reset_anchors();
        self.state = TimerState::Roll;
        self.armed = true;
        self.duration = duration_ms.max(0);
        self.started_at = Some(started_at);
        self.secondary_timer = None;
        self.update_at(now);
    }

    /// Recompute `current` from the wall clock
    pub fn update(&mut self) {
        let now = self.time.now();
        self.update_at(now);
    }

    /// Recompute `current` for a time of day already read by the caller
    pub fn update_at(&mut self, now: i64) {
        self.clock = now;

        let Some(started_at) = self.started_at else {
            return;
        };

        if let Some(paused_at) = self.paused_at {
            self.paused_interval = unwrap_after(paused_at, now) - paused_at;
        }

        self.current = started_at + self.duration + self.paused_total + self.paused_interval
            - unwrap_after(started_at, now);

        if self.current <= 0 && self.state != TimerState::Pause && self.finished_at.is_none() {
            debug!("Countdown reached zero");
            self.finished_at = Some(now);
            self.finished_flag = true;
        }
    }

    /// Add (or with a negative amount, remove) time from the countdown
    ///
    /// Crossing zero downwards marks the clock finished; crossing back up
    /// clears the finish so a later natural finish fires again.
    pub fn increment(&mut self, amount_ms: i64) {
        if !self.armed {
            return;
        }
        let before = self.current;
        self.duration = (self.duration + amount_ms).max(0);
        self.recompute(before);
    }

    /// Change the duration while keeping elapsed progress
    ///
    /// Equivalent to `finish_at = now + (duration - elapsed)`.
    pub fn reload(&mut self, duration_ms: i64) {
        if self.started_at.is_none() {
            self.setup(duration_ms, false);
            return;
        }
        let before = self.current;
        self.duration = duration_ms.max(0);
        self.recompute(before);
    }

    fn recompute(&mut self, before: i64) {
        let now = self.time.now();
        if self.started_at.is_some() {
            self.update_at(now);
        } else {
            self.current = self.duration;
            self.clock = now;
        }

        if before > 0 && self.current <= 0 && self.finished_at.is_none() {
            self.finished_at = Some(now);
            self.finished_flag = true;
        } else if before <= 0 && self.current > 0 {
            self.finished_at = None;
            self.finished_flag = false;
        }
    }

    /// Consume the one-shot finished flag
    pub fn take_finished(&mut self) -> bool {
        std::mem::take(&mut self.finished_flag)
    }

    /// Peek at the finished flag without consuming it
    pub fn finished_pending(&self) -> bool {
        self.finished_flag
    }

    /// Set the countdown to the next cue (roll mode between cues)
    pub fn set_secondary(&mut self, millis: Option<i64>) {
        self.secondary_timer = millis;
    }

    /// Time elapsed on the loaded countdown, capped at its duration
    pub fn elapsed(&self) -> i64 {
        if self.started_at.is_none() {
            return 0;
        }
        (self.duration - self.current).clamp(0, self.duration)
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Remaining time; negative in overtime
    pub fn current(&self) -> i64 {
        self.current
    }

    pub fn secondary(&self) -> Option<i64> {
        self.secondary_timer
    }

    pub fn started_at(&self) -> Option<i64> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<i64> {
        self.finished_at
    }

    /// Expected end at the current pace, as time of day
    pub fn finish_at(&self) -> Option<i64> {
        self.started_at.map(|started_at| {
            wrap_day(started_at + self.duration + self.paused_total + self.paused_interval)
        })
    }

    /// Timer values for broadcast
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            clock: self.clock,
            running: self.armed.then(|| millis_to_seconds(self.current)),
            secondary: self.secondary_timer.map(millis_to_seconds),
            duration_seconds: self.armed.then(|| millis_to_seconds(self.duration)),
            expected_finish: self.finish_at(),
            started_at: self.started_at,
        }
    }

    fn reset_anchors(&mut self) {
        self.started_at = None;
        self.paused_at = None;
        self.paused_interval = 0;
        self.paused_total = 0;
        self.finished_at = None;
        self.finished_flag = false;
    }
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock")
            .field("state", &self.state)
            .field("duration", &self.duration)
            .field("current", &self.current)
            .field("started_at", &self.started_at)
            .field("finished_at", &self.finished_at)
            .finish()
    }
}
