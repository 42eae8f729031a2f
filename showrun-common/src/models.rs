//! Rundown data model
//!
//! A rundown is the ordered list of entries for one production. Only cue
//! events reach the playback engine; blocks and delays are layout entries for
//! the editing side and are filtered out by [`filter_cues`].

use crate::time::span;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One timed cue in the rundown
///
/// Times are milliseconds since local midnight. `time_end < time_start`
/// means the cue runs through midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CueEvent {
    pub id: String,
    pub time_start: i64,
    pub time_end: i64,
    pub is_public: bool,
    /// Skipped cues stay in the rundown but never reach the engine
    pub skip: bool,
    pub title: String,
    pub subtitle: String,
    pub presenter: String,
    pub note: String,
}

impl CueEvent {
    /// Scheduled length, accounting for midnight wraparound
    pub fn duration(&self) -> i64 {
        span(self.time_start, self.time_end)
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, patch: &CuePatch) {
        if let Some(v) = patch.time_start {
            self.time_start = v;
        }
        if let Some(v) = patch.time_end {
            self.time_end = v;
        }
        if let Some(v) = patch.is_public {
            self.is_public = v;
        }
        if let Some(v) = patch.skip {
            self.skip = v;
        }
        if let Some(v) = &patch.title {
            self.title = v.clone();
        }
        if let Some(v) = &patch.subtitle {
            self.subtitle = v.clone();
        }
        if let Some(v) = &patch.presenter {
            self.presenter = v.clone();
        }
        if let Some(v) = &patch.note {
            self.note = v.clone();
        }
    }
}

/// Partial cue update; absent fields are left unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CuePatch {
    pub time_start: Option<i64>,
    pub time_end: Option<i64>,
    pub is_public: Option<bool>,
    pub skip: Option<bool>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub presenter: Option<String>,
    pub note: Option<String>,
}

impl CuePatch {
    /// True when the patch changes scheduling rather than just text
    pub fn touches_timing(&self) -> bool {
        self.time_start.is_some() || self.time_end.is_some()
    }
}

/// Rundown entry as stored by the editing side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RundownEntry {
    /// A timed cue
    Event(CueEvent),
    /// Section header
    Block {
        #[serde(default)]
        id: String,
        #[serde(default)]
        title: String,
    },
    /// Schedule offset marker
    Delay {
        #[serde(default)]
        id: String,
        #[serde(default)]
        duration: i64,
    },
}

/// Keep only playable cues, in rundown order
pub fn filter_cues(entries: Vec<RundownEntry>) -> Vec<CueEvent> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            RundownEntry::Event(cue) if !cue.skip => Some(cue),
            _ => None,
        })
        .collect()
}

/// Parse a JSON rundown (array of tagged entries) into playable cues
pub fn parse_rundown(json: &str) -> Result<Vec<CueEvent>> {
    let entries: Vec<RundownEntry> = serde_json::from_str(json)?;
    Ok(filter_cues(entries))
}

/// Load a JSON rundown file from disk
pub fn load_rundown_file(path: &Path) -> Result<Vec<CueEvent>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Cannot read rundown {}: {}", path.display(), e))
    })?;
    parse_rundown(&content)
}
