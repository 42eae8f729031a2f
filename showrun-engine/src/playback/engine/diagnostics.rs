//! Engine state accessors and snapshots

use showrun_common::events::{CyclePhase, Messages, ShowSnapshot, Titles};
use showrun_common::CueEvent;

use super::core::PlaybackEngine;
use crate::playback::clock::Clock;
use crate::playback::titles::Selection;

impl PlaybackEngine {
    /// Complete state for broadcast and the state endpoint
    pub fn snapshot(&self) -> ShowSnapshot {
        ShowSnapshot {
            timer: self.clock.snapshot(),
            play_state: self.clock.state(),
            phase: self.phase,
            selection: self.selection.info(self.rundown.len()),
            titles: self.titles.clone(),
            messages: self.messages.clone(),
        }
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn titles(&self) -> &Titles {
        &self.titles
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn rundown(&self) -> &[CueEvent] {
        &self.rundown
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}

impl std::fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("phase", &self.phase)
            .field("clock", &self.clock)
            .field("selection", &self.selection)
            .field("cues", &self.rundown.len())
            .finish()
    }
}
