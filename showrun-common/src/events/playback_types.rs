//! Playback-related type definitions
//!
//! Supporting enums for timer state and the playback lifecycle.

use serde::{Deserialize, Serialize};

/// Clock play state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Nothing running
    #[default]
    Stop,
    /// Counting down under manual control
    Start,
    /// Frozen, resumable without losing time
    Pause,
    /// Driven by time of day
    Roll,
}

impl TimerState {
    /// Whether the clock is advancing
    pub fn is_running(self) -> bool {
        matches!(self, TimerState::Start | TimerState::Roll)
    }
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerState::Stop => write!(f, "stop"),
            TimerState::Start => write!(f, "start"),
            TimerState::Pause => write!(f, "pause"),
            TimerState::Roll => write!(f, "roll"),
        }
    }
}

/// Lifecycle phase of the playback engine
///
/// Exactly one phase is active at a time. `Idle`, `Armed` and `OnUpdate`
/// are the resting phases; the others are passed through while a change is
/// being applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum CyclePhase {
    /// No cue loaded
    #[default]
    Idle,
    /// A cue was just loaded
    OnLoad,
    /// Loaded and ready, not running
    Armed,
    /// Playback just started or resumed
    OnStart,
    /// Running; re-entered on every tick
    OnUpdate,
    /// Playback just paused
    OnPause,
    /// Playback just stopped
    OnStop,
    /// The countdown just reached zero
    OnFinish,
}

impl std::fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CyclePhase::Idle => write!(f, "idle"),
            CyclePhase::OnLoad => write!(f, "onLoad"),
            CyclePhase::Armed => write!(f, "armed"),
            CyclePhase::OnStart => write!(f, "onStart"),
            CyclePhase::OnUpdate => write!(f, "onUpdate"),
            CyclePhase::OnPause => write!(f, "onPause"),
            CyclePhase::OnStop => write!(f, "onStop"),
            CyclePhase::OnFinish => write!(f, "onFinish"),
        }
    }
}

/// Operator message slot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Shown to the presenter on stage
    Presenter,
    /// Shown on public displays
    Public,
    /// Lower-third graphics feed
    Lower,
}

impl std::str::FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "presenter" => Ok(MessageKind::Presenter),
            "public" => Ok(MessageKind::Public),
            "lower" => Ok(MessageKind::Lower),
            other => Err(format!("unknown message kind '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TimerState::Roll).unwrap(), "\"roll\"");
        assert_eq!(TimerState::Pause.to_string(), "pause");
    }

    #[test]
    fn test_cycle_phase_serializes_camel_case() {
        assert_eq!(serde_json::to_string(&CyclePhase::OnLoad).unwrap(), "\"onLoad\"");
        assert_eq!(CyclePhase::OnFinish.to_string(), "onFinish");
    }

    #[test]
    fn test_message_kind_from_str() {
        assert_eq!("lower".parse::<MessageKind>(), Ok(MessageKind::Lower));
        assert!("sidebar".parse::<MessageKind>().is_err());
    }

    #[test]
    fn test_running_states() {
        assert!(TimerState::Start.is_running());
        assert!(TimerState::Roll.is_running());
        assert!(!TimerState::Pause.is_running());
        assert!(!TimerState::Stop.is_running());
    }
}
