//! Playback command vocabulary

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Action accepted by `PlaybackEngine::trigger`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    Start,
    Pause,
    Stop,
    Roll,
    Previous,
    Next,
    Unload,
    Reload,
}

impl FromStr for PlaybackAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "play" => Ok(PlaybackAction::Start),
            "pause" => Ok(PlaybackAction::Pause),
            "stop" => Ok(PlaybackAction::Stop),
            "roll" => Ok(PlaybackAction::Roll),
            "previous" | "prev" => Ok(PlaybackAction::Previous),
            "next" => Ok(PlaybackAction::Next),
            "unload" => Ok(PlaybackAction::Unload),
            "reload" => Ok(PlaybackAction::Reload),
            _ => Err(Error::InvalidInput(format!("Unknown playback action: {}", s))),
        }
    }
}

impl fmt::Display for PlaybackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackAction::Start => "start",
            PlaybackAction::Pause => "pause",
            PlaybackAction::Stop => "stop",
            PlaybackAction::Roll => "roll",
            PlaybackAction::Previous => "previous",
            PlaybackAction::Next => "next",
            PlaybackAction::Unload => "unload",
            PlaybackAction::Reload => "reload",
        };
        f.write_str(name)
    }
}

/// How `load_event` treats the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Fresh countdown from the cue's full duration
    Load,
    /// Keep elapsed progress, adopt the cue's new duration
    Reload,
}
