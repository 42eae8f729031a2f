//! Shared broadcast state
//!
//! The engine publishes [`ShowEvent`]s through the [`BroadcastPort`] trait.
//! [`SharedState`] is the production implementation: it fans events out on
//! the [`EventBus`] and keeps the latest full snapshot so a display that
//! connects mid-show can be brought up to date at once.

use std::sync::Mutex;

use showrun_common::events::{EventBus, ShowEvent, ShowSnapshot};
use tokio::sync::broadcast;

/// Default capacity of the broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Outbound state channel used by the engine
///
/// Implementations must not block.
pub trait BroadcastPort: Send + Sync {
    fn broadcast(&self, event: ShowEvent);
}

/// Shared state accessible by the engine and the HTTP layer
pub struct SharedState {
    bus: EventBus,
    /// Latest full snapshot, timer kept current by `Timer` events
    last_snapshot: Mutex<Option<ShowSnapshot>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bus: EventBus::new(capacity),
            last_snapshot: Mutex::new(None),
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ShowEvent> {
        self.bus.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }

    /// Latest full snapshot seen on the channel
    pub fn last_snapshot(&self) -> Option<ShowSnapshot> {
        self.last_snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn remember(&self, event: &ShowEvent) {
        let mut cached = self
            .last_snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match event {
            ShowEvent::State(snapshot) => *cached = Some((**snapshot).clone()),
            ShowEvent::Timer(timer) => {
                if let Some(snapshot) = cached.as_mut() {
                    snapshot.timer = timer.clone();
                }
            }
            ShowEvent::RundownChanged { total } => {
                if let Some(snapshot) = cached.as_mut() {
                    snapshot.selection.total = *total;
                }
            }
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastPort for SharedState {
    fn broadcast(&self, event: ShowEvent) {
        self.remember(&event);
        self.bus.emit_lossy(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showrun_common::events::TimerSnapshot;

    #[test]
    fn test_caches_state_and_follows_timer() {
        let state = SharedState::new();
        assert!(state.last_snapshot().is_none());

        // Timer before any full snapshot is not cached
        state.broadcast(ShowEvent::Timer(TimerSnapshot::default()));
        assert!(state.last_snapshot().is_none());

        state.broadcast(ShowEvent::State(Box::default()));
        state.broadcast(ShowEvent::Timer(TimerSnapshot {
            clock: 42,
            ..Default::default()
        }));
        state.broadcast(ShowEvent::RundownChanged { total: 7 });

        let cached = state.last_snapshot().unwrap();
        assert_eq!(cached.timer.clock, 42);
        assert_eq!(cached.selection.total, 7);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_subscribers() {
        let state = SharedState::new();
        let mut rx = state.subscribe_events();
        state.broadcast(ShowEvent::RundownChanged { total: 2 });
        assert_eq!(rx.recv().await.unwrap(), ShowEvent::RundownChanged { total: 2 });
    }
}
