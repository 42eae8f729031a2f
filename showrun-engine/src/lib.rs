//! # showrun engine (showrun-engine)
//!
//! Countdown playback engine for live show control.
//!
//! **Purpose:** Count cues of a rundown down against the wall clock, either
//! under operator control or rolling from the time of day, and fire OSC and
//! HTTP triggers on every lifecycle transition.
//!
//! **Architecture:** A single actor task owns the [`PlaybackEngine`]; the
//! axum API and the tick both go through its command queue. Integrations and
//! broadcasts leave the engine through non-blocking ports.

pub mod api;
pub mod config;
pub mod error;
pub mod integrations;
pub mod playback;
pub mod state;

pub use error::{Error, Result};
pub use playback::{EngineHandle, PlaybackEngine};
pub use state::{BroadcastPort, SharedState};
