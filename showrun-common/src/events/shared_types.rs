//! Shared snapshot types carried by broadcast events

use serde::{Deserialize, Serialize};

use super::playback_types::{CyclePhase, MessageKind, TimerState};
use crate::models::CueEvent;

/// Lightweight timer snapshot, sent on every running tick
///
/// `clock`, `expected_finish` and `started_at` are milliseconds since
/// midnight; `running`, `secondary` and `duration_seconds` are seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    /// Current time of day
    pub clock: i64,
    /// Remaining time on the loaded cue (negative in overtime)
    pub running: Option<f64>,
    /// Countdown to the next cue while rolling between cues
    pub secondary: Option<f64>,
    /// Full duration of the loaded cue
    pub duration_seconds: Option<f64>,
    /// When the cue is expected to end at the current pace
    pub expected_finish: Option<i64>,
    /// When the cue started
    pub started_at: Option<i64>,
}

/// Position of the loaded cue in the rundown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SelectionInfo {
    pub id: Option<String>,
    pub index: Option<usize>,
    pub total: usize,
}

/// Title fields of one cue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TitleCard {
    pub title: String,
    pub subtitle: String,
    pub presenter: String,
    /// Operator note; only carried on the private track
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TitleCard {
    /// Private-track card, note included
    pub fn private(cue: &CueEvent) -> Self {
        Self {
            title: cue.title.clone(),
            subtitle: cue.subtitle.clone(),
            presenter: cue.presenter.clone(),
            note: Some(cue.note.clone()),
        }
    }

    /// Public-track card, note withheld
    pub fn public(cue: &CueEvent) -> Self {
        Self {
            title: cue.title.clone(),
            subtitle: cue.subtitle.clone(),
            presenter: cue.presenter.clone(),
            note: None,
        }
    }
}

/// Now/next titles for one audience
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TitleTrack {
    pub now_id: Option<String>,
    pub now: Option<TitleCard>,
    pub next_id: Option<String>,
    pub next: Option<TitleCard>,
}

/// Both title tracks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Titles {
    /// What the operator sees: the cue actually loaded
    pub private: TitleTrack,
    /// What public displays see: public cues only
    pub public: TitleTrack,
}

/// Operator message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Message {
    pub text: String,
    pub visible: bool,
}

/// All operator message slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Messages {
    pub presenter: Message,
    pub public: Message,
    pub lower: Message,
}

impl Messages {
    /// Mutable access to one slot
    pub fn slot_mut(&mut self, kind: MessageKind) -> &mut Message {
        match kind {
            MessageKind::Presenter => &mut self.presenter,
            MessageKind::Public => &mut self.public,
            MessageKind::Lower => &mut self.lower,
        }
    }
}

/// Full engine state, sent on lifecycle transitions and on request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShowSnapshot {
    pub timer: TimerSnapshot,
    pub play_state: TimerState,
    pub phase: CyclePhase,
    pub selection: SelectionInfo,
    pub titles: Titles,
    pub messages: Messages,
}
