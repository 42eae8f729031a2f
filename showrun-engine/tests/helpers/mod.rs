//! Test helpers for showrun-engine integration tests
//!
//! - Recording ports that capture integration requests and broadcasts
//! - TestEngine: a PlaybackEngine on a manual clock
//! - Rundown fixtures

#![allow(dead_code)]

pub mod fixtures;
pub mod recording;

pub use fixtures::{cue, public_cue, three_cue_rundown};
pub use recording::{RecordingBroadcast, RecordingIntegrations, TestEngine};
