//! Rundown mutations
//!
//! After any change the selection is found again by cue id, since entries
//! may have moved. If the loaded cue was removed the engine unloads and
//! returns to idle.

use showrun_common::{CueEvent, CuePatch};
use tracing::{debug, info, warn};

use super::core::PlaybackEngine;
use crate::playback::commands::LoadMode;
use crate::playback::titles::resolve_for_index;

impl PlaybackEngine {
    /// Install a fresh rundown
    ///
    /// Manual playback is unloaded; roll mode keeps rolling against the new
    /// list.
    pub fn setup_with_event_list(&mut self, events: Vec<CueEvent>) {
        self.rundown = playable(events);
        info!("Rundown set up with {} cues", self.rundown.len());
        self.broadcast_rundown();

        if self.is_rolling() {
            self.roll_pass();
        } else {
            self.reset_playback();
        }
        self.run_cycle(false);
    }

    /// Replace the rundown, keeping the loaded cue if it is still present
    pub fn update_event_list(&mut self, events: Vec<CueEvent>) {
        self.rundown = playable(events);
        debug!("Rundown replaced, {} cues", self.rundown.len());
        self.resync_selection(None, true);
        self.run_cycle(false);
    }

    /// Patch one cue; returns `false` for an unknown id
    ///
    /// Setting `skip` removes the cue from playback.
    pub fn update_single_event(&mut self, id: &str, patch: &CuePatch) -> bool {
        let Some(index) = self.rundown.iter().position(|cue| cue.id == id) else {
            warn!("Update for unknown cue {}", id);
            return false;
        };

        let skipped = patch.skip == Some(true);
        if skipped {
            info!("Cue {} skipped", id);
            self.rundown.remove(index);
        } else if let Some(cue) = self.rundown.get_mut(index) {
            cue.apply(patch);
        }

        self.resync_selection(Some(id), skipped || patch.touches_timing());
        self.run_cycle(false);
        true
    }

    /// Remove one cue; returns `false` for an unknown id
    pub fn delete_id(&mut self, id: &str) -> bool {
        let Some(index) = self.rundown.iter().position(|cue| cue.id == id) else {
            warn!("Delete for unknown cue {}", id);
            return false;
        };

        self.rundown.remove(index);
        info!("Cue {} deleted", id);
        self.resync_selection(Some(id), true);
        self.run_cycle(false);
        true
    }

    /// Re-resolve the selection after the rundown changed
    ///
    /// `changed` names the edited cue; `None` means the whole list changed.
    /// The clock is reloaded only when `retimed` is set and the loaded cue
    /// or the one after it is involved. Text-only edits refresh titles.
    fn resync_selection(&mut self, changed: Option<&str>, retimed: bool) {
        self.broadcast_rundown();

        if self.is_rolling() {
            self.roll_pass();
            return;
        }

        let Some(selected_id) = self.selection.id.clone() else {
            return;
        };
        let involved = retimed && changed.map_or(true, |id| self.selection.involves(id));

        match self.rundown.iter().position(|cue| cue.id == selected_id) {
            None => {
                info!("Loaded cue {} left the rundown, unloading", selected_id);
                self.reset_playback();
            }
            Some(index) if involved => {
                self.load_event(index, LoadMode::Reload);
            }
            Some(index) => {
                if let Some(resolved) = resolve_for_index(&self.rundown, index) {
                    self.selection = resolved.selection;
                    self.titles = resolved.titles;
                    self.state_dirty = true;
                }
            }
        }
    }
}

fn playable(mut events: Vec<CueEvent>) -> Vec<CueEvent> {
    events.retain(|cue| !cue.skip);
    events
}
