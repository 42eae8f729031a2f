//! Event types for the showrun broadcast channel
//!
//! Provides the broadcast event enum and the EventBus that carries it to
//! displays and operator clients.

mod playback_types;
mod shared_types;

pub use playback_types::{CyclePhase, MessageKind, TimerState};
pub use shared_types::{
    Message, Messages, SelectionInfo, ShowSnapshot, TimerSnapshot, TitleCard, TitleTrack, Titles,
};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Broadcast event
///
/// Serialised with a `type` tag so SSE clients can dispatch on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ShowEvent {
    /// Timer values only, sent on every running tick
    Timer(TimerSnapshot),

    /// Complete engine state, sent on lifecycle transitions
    State(Box<ShowSnapshot>),

    /// The rundown was replaced or edited
    RundownChanged {
        /// Number of playable cues after the change
        total: usize,
    },
}

impl ShowEvent {
    /// Event name used for the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            ShowEvent::Timer(_) => "Timer",
            ShowEvent::State(_) => "State",
            ShowEvent::RundownChanged { .. } => "RundownChanged",
        }
    }
}

// ============================================================================
// EventBus Implementation
// ============================================================================

/// Fan-out channel for [`ShowEvent`]s
///
/// Backed by `tokio::sync::broadcast`: slow subscribers lag and drop old
/// events instead of blocking the sender.
pub struct EventBus {
    tx: broadcast::Sender<ShowEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<ShowEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: ShowEvent) {
        let _ = self.tx.send(event);
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_event_tagged_serialization() {
        let event = ShowEvent::RundownChanged { total: 3 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "RundownChanged");
        assert_eq!(json["payload"]["total"], 3);
        assert_eq!(event.event_type(), "RundownChanged");
    }

    #[test]
    fn test_timer_event_round_trip() {
        let event = ShowEvent::Timer(TimerSnapshot {
            clock: 1000,
            running: Some(12.5),
            ..Default::default()
        });
        let json = serde_json::to_string(&event).unwrap();
        let back: ShowEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[tokio::test]
    async fn test_event_bus_delivers_to_subscribers() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.emit_lossy(ShowEvent::RundownChanged { total: 1 });
        let received = rx.recv().await.unwrap();
        assert_eq!(received, ShowEvent::RundownChanged { total: 1 });
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new(4);
        assert_eq!(bus.subscriber_count(), 0);
        bus.emit_lossy(ShowEvent::RundownChanged { total: 0 });
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags_instead_of_blocking() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for total in 0..5 {
            bus.emit_lossy(ShowEvent::RundownChanged { total });
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(3))
        ));
        assert_eq!(
            rx.recv().await.unwrap(),
            ShowEvent::RundownChanged { total: 3 }
        );
    }
}
