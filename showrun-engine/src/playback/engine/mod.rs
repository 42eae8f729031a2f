//! Playback engine
//!
//! **Module Structure:**
//! - `core.rs`: struct, lifecycle evaluation, phase dispatch
//! - `playback.rs`: playback commands, roll passes, the tick
//! - `rundown.rs`: rundown mutations and selection resync
//! - `diagnostics.rs`: snapshots and accessors

mod core;
mod diagnostics;
mod playback;
mod rundown;

pub use core::PlaybackEngine;
pub use playback::MAX_INCREMENT_MS;
