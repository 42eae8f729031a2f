//! Playback: clock, roll selection, lifecycle and the engine actor

pub mod clock;
pub mod commands;
pub mod cycle;
pub mod engine;
pub mod runner;
pub mod selection;
pub mod titles;

pub use clock::Clock;
pub use commands::{LoadMode, PlaybackAction};
pub use engine::PlaybackEngine;
pub use runner::{spawn_engine, EngineHandle};
pub use selection::{select_by_roll, RollSelection};
