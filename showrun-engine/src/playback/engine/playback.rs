//! Playback commands and the tick
//!
//! Every public entry point mutates state and then runs one lifecycle
//! evaluation before returning, so a command's effects are dispatched
//! immediately rather than on the next tick.

use showrun_common::events::{MessageKind, TimerState};
use showrun_common::human_time::{format_time_of_day, format_timer_opt};
use tracing::{debug, info, warn};

use super::core::PlaybackEngine;
use crate::error::{Error, Result};
use crate::integrations::OscKey;
use crate::playback::commands::{LoadMode, PlaybackAction};
use crate::playback::selection::select_by_roll;
use crate::playback::titles::{resolve_for_index, resolve_for_roll, Selection};

/// Largest accepted `increment` step (5 minutes)
pub const MAX_INCREMENT_MS: i64 = 300_000;

impl PlaybackEngine {
    /// Apply a playback action by name
    ///
    /// Returns `false` for an unknown action, which changes nothing. Known
    /// actions return `true` even when they do not apply to the current
    /// state.
    pub fn trigger(&mut self, action: &str) -> bool {
        match action.parse::<PlaybackAction>() {
            Ok(action) => {
                self.apply_action(action);
                true
            }
            Err(e) => {
                warn!("Rejected playback command: {}", e);
                false
            }
        }
    }

    pub fn apply_action(&mut self, action: PlaybackAction) {
        info!("Playback command: {}", action);
        match action {
            PlaybackAction::Start => self.start(),
            PlaybackAction::Pause => self.pause(),
            PlaybackAction::Stop => self.stop(),
            PlaybackAction::Roll => self.roll(),
            PlaybackAction::Previous => self.step(false),
            PlaybackAction::Next => self.step(true),
            PlaybackAction::Unload => self.unload(),
            PlaybackAction::Reload => self.reload(),
        }
        self.run_cycle(false);
    }

    /// Load a cue by id and evaluate
    pub fn load_event_by_id(&mut self, id: &str) -> bool {
        match self.rundown.iter().position(|cue| cue.id == id) {
            Some(index) => self.load_event_by_index(index),
            None => {
                warn!("Cannot load unknown cue {}", id);
                false
            }
        }
    }

    /// Load a cue by rundown position and evaluate
    ///
    /// Leaves roll mode.
    pub fn load_event_by_index(&mut self, index: usize) -> bool {
        if self.is_rolling() {
            info!("Manual load leaves roll mode");
        }
        let loaded = self.load_event(index, LoadMode::Load);
        self.run_cycle(false);
        loaded
    }

    /// Add or remove time on the loaded cue
    pub fn increment(&mut self, amount_ms: i64) -> Result<()> {
        if !(-MAX_INCREMENT_MS..=MAX_INCREMENT_MS).contains(&amount_ms) {
            return Err(Error::InvalidInput(format!(
                "Increment {} ms outside ±{} ms",
                amount_ms, MAX_INCREMENT_MS
            )));
        }
        if self.is_rolling() {
            debug!("Increment ignored while rolling");
            return Ok(());
        }
        if !self.selection.is_loaded() {
            debug!("Increment ignored, nothing loaded");
            return Ok(());
        }

        info!("Increment {} ms", amount_ms);
        self.clock.increment(amount_ms);
        self.state_dirty = true;
        self.run_cycle(false);
        Ok(())
    }

    /// Update an operator message slot
    pub fn set_message(&mut self, kind: MessageKind, text: Option<String>, visible: Option<bool>) {
        let slot = self.messages.slot_mut(kind);
        if let Some(text) = text {
            slot.text = text;
        }
        if let Some(visible) = visible {
            slot.visible = visible;
        }
        self.state_dirty = true;
        self.run_cycle(false);
    }

    /// Periodic re-evaluation
    pub fn tick(&mut self) {
        if self.is_rolling() {
            self.roll_pass();
        } else {
            self.clock.update();
        }

        // Keep displays current when no phase broadcasts on this tick
        if !self.run_cycle(true) {
            self.broadcast_timer();
        }
    }

    fn start(&mut self) {
        if self.is_rolling() || !self.selection.is_loaded() {
            debug!("Start ignored");
            return;
        }
        self.clock.start();
    }

    fn pause(&mut self) {
        if self.is_rolling() || !self.selection.is_loaded() {
            debug!("Pause ignored");
            return;
        }
        self.clock.pause();
    }

    fn stop(&mut self) {
        if !self.is_rolling() && !self.selection.is_loaded() && self.clock.state() == TimerState::Stop {
            debug!("Stop ignored, already stopped");
            return;
        }
        self.reset_playback();
    }

    fn unload(&mut self) {
        self.reset_playback();
    }

    fn roll(&mut self) {
        if !self.is_rolling() {
            info!("Entering roll mode");
            self.reset_playback();
            self.clock.roll_idle();
        }
        self.roll_pass();
    }

    fn step(&mut self, forward: bool) {
        if self.is_rolling() {
            debug!("Manual advance ignored while rolling");
            return;
        }
        let Some(last) = self.rundown.len().checked_sub(1) else {
            return;
        };

        let target = match self.selection.index {
            None => 0,
            Some(index) if forward => (index + 1).min(last),
            Some(index) => index.saturating_sub(1),
        };
        if self.selection.index == Some(target) {
            return;
        }

        self.clock.pause();
        if self.load_event(target, LoadMode::Load) {
            self.send_osc(if forward { OscKey::Next } else { OscKey::Prev });
        }
    }

    fn reload(&mut self) {
        if self.is_rolling() {
            self.roll_pass();
            return;
        }
        if let Some(index) = self.selection.index {
            if self.load_event(index, LoadMode::Reload) {
                self.send_osc(OscKey::Reload);
            }
        }
    }

    /// Clear clock, selection and titles
    pub(super) fn reset_playback(&mut self) {
        self.clock.stop();
        self.selection = Selection::default();
        self.titles = Default::default();
        self.load_pending = false;
        self.state_dirty = true;
    }

    /// Point the engine at `index`
    ///
    /// `Load` restarts the countdown from the cue's full duration and
    /// re-enters `onLoad`. `Reload` keeps elapsed progress.
    pub(super) fn load_event(&mut self, index: usize, mode: LoadMode) -> bool {
        let Some(resolved) = resolve_for_index(&self.rundown, index) else {
            warn!("Cannot load cue at index {} of {}", index, self.rundown.len());
            return false;
        };
        let duration = self.rundown.get(index).map(|cue| cue.duration()).unwrap_or(0);

        match mode {
            LoadMode::Load => {
                self.clock.setup(duration, false);
                self.load_pending = true;
            }
            LoadMode::Reload => self.clock.reload(duration),
        }
        debug!("{:?} cue {:?} at index {}", mode, resolved.selection.id, index);

        self.selection = resolved.selection;
        self.titles = resolved.titles;
        self.state_dirty = true;
        true
    }

    /// Select the running cue from the time of day
    ///
    /// A cue that ends on this pass finishes (`onFinish`) before the next
    /// cue loads or the engine goes idle.
    pub(super) fn roll_pass(&mut self) {
        let now = self.time.now();
        if self.selection.is_loaded() {
            self.clock.update_at(now);
        }

        let result = select_by_roll(&self.rundown, now);
        let leaving = self.selection.is_loaded() && result.now_id != self.selection.id;
        if leaving && self.clock.finished_pending() {
            debug!("Roll finishes cue {:?} before moving on", self.selection.id);
            self.run_cycle(false);
        }

        let resolved = resolve_for_roll(&self.rundown, &result);

        match (&result.now_id, result.timers) {
            (Some(id), Some(timers)) => {
                let same_cue = self.selection.id.as_deref() == Some(id.as_str());
                if !same_cue {
                    info!("Roll loads cue {} at {}", id, format_time_of_day(now));
                    self.load_pending = true;
                    self.clock.roll(timers.started_at, timers.duration, now);
                } else if self.clock.started_at() != Some(timers.started_at)
                    || self.clock.duration() != timers.duration
                {
                    debug!("Roll re-anchors cue {}", id);
                    self.clock.roll(timers.started_at, timers.duration, now);
                } else {
                    self.clock.update_at(now);
                }
                self.clock.set_secondary(None);
            }
            _ => {
                if self.selection.is_loaded() || self.clock.is_armed() {
                    info!(
                        "Roll waiting, next cue in {}",
                        format_timer_opt(result.time_to_next)
                    );
                    self.clock.roll_idle();
                }
                self.clock.update_at(now);
                self.clock.set_secondary(result.time_to_next);
            }
        }

        if resolved.selection != self.selection || resolved.titles != self.titles {
            self.state_dirty = true;
        }
        self.selection = resolved.selection;
        self.titles = resolved.titles;
    }

    pub fn is_rolling(&self) -> bool {
        self.clock.state() == TimerState::Roll
    }
}
