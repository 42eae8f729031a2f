//! Recording ports and a manually clocked engine

use std::sync::{Arc, Mutex};

use showrun_common::events::{ShowEvent, ShowSnapshot};
use showrun_common::time::ManualTime;
use showrun_engine::config::HttpTriggers;
use showrun_engine::integrations::{IntegrationPort, IntegrationRequest, OscKey};
use showrun_engine::{BroadcastPort, PlaybackEngine};

/// Integration port that keeps every request
#[derive(Debug, Clone, Default)]
pub struct RecordingIntegrations {
    requests: Arc<Mutex<Vec<IntegrationRequest>>>,
}

impl RecordingIntegrations {
    pub fn requests(&self) -> Vec<IntegrationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn osc_keys(&self) -> Vec<OscKey> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                IntegrationRequest::Osc { key, .. } => Some(key),
                IntegrationRequest::Http { .. } => None,
            })
            .collect()
    }

    pub fn count(&self, key: OscKey) -> usize {
        self.osc_keys().into_iter().filter(|k| *k == key).count()
    }

    pub fn http_urls(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                IntegrationRequest::Http { url } => Some(url),
                IntegrationRequest::Osc { .. } => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.requests.lock().unwrap().clear();
    }
}

impl IntegrationPort for RecordingIntegrations {
    fn dispatch(&self, request: IntegrationRequest) {
        self.requests.lock().unwrap().push(request);
    }
}

/// Broadcast port that keeps every event
#[derive(Debug, Clone, Default)]
pub struct RecordingBroadcast {
    events: Arc<Mutex<Vec<ShowEvent>>>,
}

impl RecordingBroadcast {
    pub fn events(&self) -> Vec<ShowEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn full_states(&self) -> Vec<ShowSnapshot> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ShowEvent::State(snapshot) => Some(*snapshot),
                _ => None,
            })
            .collect()
    }

    pub fn timer_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ShowEvent::Timer(_)))
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl BroadcastPort for RecordingBroadcast {
    fn broadcast(&self, event: ShowEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Engine wired to a manual clock and recording ports
pub struct TestEngine {
    pub engine: PlaybackEngine,
    pub time: ManualTime,
    pub integrations: RecordingIntegrations,
    pub broadcast: RecordingBroadcast,
}

impl TestEngine {
    pub fn new(start_ms: i64) -> Self {
        Self::with_triggers(start_ms, HttpTriggers::default())
    }

    pub fn with_triggers(start_ms: i64, triggers: HttpTriggers) -> Self {
        let time = ManualTime::new(start_ms);
        let integrations = RecordingIntegrations::default();
        let broadcast = RecordingBroadcast::default();
        let engine = PlaybackEngine::new(
            Arc::new(time.clone()),
            Arc::new(integrations.clone()),
            Arc::new(broadcast.clone()),
            triggers,
        );
        Self {
            engine,
            time,
            integrations,
            broadcast,
        }
    }

    /// Advance the manual clock and tick once
    pub fn advance_and_tick(&mut self, delta_ms: i64) {
        self.time.advance(delta_ms);
        self.engine.tick();
    }
}
