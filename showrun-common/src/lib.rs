//! # showrun common library
//!
//! Shared code for the showrun crates:
//! - Rundown data model (cue events, partial updates)
//! - Broadcast event types and the EventBus
//! - Time-of-day utilities and timer formatting
//! - Configuration file resolution

pub mod config;
pub mod error;
pub mod events;
pub mod human_time;
pub mod models;
pub mod time;

pub use error::{Error, Result};
pub use models::{CueEvent, CuePatch, RundownEntry};
