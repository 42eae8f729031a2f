//! Core playback engine - state and lifecycle evaluation
//!
//! **Responsibilities:**
//! - PlaybackEngine struct definition and initialization
//! - Lifecycle evaluation (`run_cycle`) over the transition table
//! - Per-phase dispatch of OSC, HTTP and broadcast side effects

use std::sync::Arc;

use showrun_common::events::{CyclePhase, Messages, ShowEvent, TitleCard, Titles};
use showrun_common::human_time::format_timer;
use showrun_common::time::TimeSource;
use showrun_common::CueEvent;
use tracing::{debug, info, warn};

use crate::config::HttpTriggers;
use crate::integrations::{
    build_trigger_url, IntegrationPort, IntegrationRequest, OscKey, OscPayload, TemplateValues,
};
use crate::playback::clock::Clock;
use crate::playback::cycle::{dispatch_entry, is_resting, next_phase, BroadcastKind, CycleContext};
use crate::playback::titles::Selection;
use crate::state::BroadcastPort;

/// Upper bound on transitions in one evaluation
///
/// The longest legal cascade is onLoad → armed → onStart → onUpdate →
/// onFinish → onUpdate.
const MAX_CYCLE_STEPS: usize = 12;

/// Playback engine - owns the clock, rundown and lifecycle
///
/// Plain synchronous state: the runner task is its only owner, so commands
/// and ticks are applied one at a time.
pub struct PlaybackEngine {
    pub(super) time: Arc<dyn TimeSource>,
    pub(super) clock: Clock,

    /// Playable cues in rundown order
    pub(super) rundown: Vec<CueEvent>,

    pub(super) phase: CyclePhase,
    pub(super) selection: Selection,
    pub(super) titles: Titles,
    pub(super) messages: Messages,

    /// A cue was (re)loaded and `onLoad` has not run yet
    pub(super) load_pending: bool,

    /// State changed without a phase change; broadcast at end of cycle
    pub(super) state_dirty: bool,

    pub(super) integrations: Arc<dyn IntegrationPort>,
    pub(super) broadcaster: Arc<dyn BroadcastPort>,
    pub(super) http_triggers: HttpTriggers,
}

impl PlaybackEngine {
    pub fn new(
        time: Arc<dyn TimeSource>,
        integrations: Arc<dyn IntegrationPort>,
        broadcaster: Arc<dyn BroadcastPort>,
        http_triggers: HttpTriggers,
    ) -> Self {
        Self {
            clock: Clock::new(Arc::clone(&time)),
            time,
            rundown: Vec::new(),
            phase: CyclePhase::Idle,
            selection: Selection::default(),
            titles: Titles::default(),
            messages: Messages::default(),
            load_pending: false,
            state_dirty: false,
            integrations,
            broadcaster,
            http_triggers,
        }
    }

    /// Follow the transition table until a resting phase is reached
    ///
    /// `tick` marks a tick-driven evaluation, which re-enters `onUpdate`
    /// once. Returns whether any phase was entered.
    pub(super) fn run_cycle(&mut self, tick: bool) -> bool {
        let mut tick_reentry = tick;
        let mut entered = false;
        let mut full_sent = false;

        for _ in 0..MAX_CYCLE_STEPS {
            let ctx = CycleContext {
                load_pending: self.load_pending,
                loaded: self.selection.is_loaded(),
                timer_state: self.clock.state(),
                finished: self.clock.finished_pending(),
                tick_reentry,
            };
            let Some(next) = next_phase(self.phase, &ctx) else {
                break;
            };
            tick_reentry = false;
            entered = true;
            full_sent |= self.enter_phase(next);
        }

        if !is_resting(self.phase) {
            warn!("Lifecycle evaluation stopped in transient phase {}", self.phase);
        }

        if self.state_dirty && !full_sent {
            self.broadcast_state();
        }
        self.state_dirty = false;

        entered
    }

    /// Enter `phase` and fire its dispatch entry; returns whether a full
    /// snapshot was broadcast
    fn enter_phase(&mut self, phase: CyclePhase) -> bool {
        if phase == CyclePhase::OnUpdate && self.phase == CyclePhase::OnUpdate {
            debug!("Cycle {}", phase);
        } else {
            info!("Cycle {} -> {}", self.phase, phase);
        }
        self.phase = phase;

        match phase {
            CyclePhase::OnLoad => self.load_pending = false,
            CyclePhase::OnFinish => {
                self.clock.take_finished();
            }
            _ => {}
        }

        self.dispatch(phase)
    }

    fn dispatch(&mut self, phase: CyclePhase) -> bool {
        let entry = dispatch_entry(phase);

        if let Some(key) = entry.osc {
            let (key, payload) = self.osc_message(key);
            self.integrations
                .dispatch(IntegrationRequest::Osc { key, payload });
        }

        if entry.http {
            if let Some(trigger) = self.http_triggers.for_phase(phase) {
                match build_trigger_url(&trigger.url, &self.template_values()) {
                    Ok(url) => self.integrations.dispatch(IntegrationRequest::Http { url }),
                    Err(e) => warn!("Skipping {} trigger: {}", phase, e),
                }
            }
        }

        match entry.broadcast {
            BroadcastKind::Full => {
                self.broadcast_state();
                true
            }
            BroadcastKind::Timer => {
                self.broadcast_timer();
                false
            }
            BroadcastKind::None => false,
        }
    }

    /// Payload for a phase's OSC key
    fn osc_message(&self, key: OscKey) -> (OscKey, Option<OscPayload>) {
        match key {
            OscKey::Time | OscKey::Overtime => {
                let current = self.clock.current();
                let key = if current < 0 { OscKey::Overtime } else { OscKey::Time };
                (key, Some(OscPayload::Text(format_timer(current))))
            }
            OscKey::Title => {
                let title = self
                    .titles
                    .private
                    .now
                    .as_ref()
                    .map(|card| card.title.clone())
                    .unwrap_or_default();
                (key, Some(OscPayload::Text(title)))
            }
            _ => (key, None),
        }
    }

    /// Command-side OSC message outside the lifecycle table
    pub(super) fn send_osc(&self, key: OscKey) {
        self.integrations
            .dispatch(IntegrationRequest::Osc { key, payload: None });
    }

    pub(super) fn template_values(&self) -> TemplateValues {
        let (title, presenter, subtitle) = card_fields(self.titles.private.now.as_ref());
        let (next_title, next_presenter, next_subtitle) =
            card_fields(self.titles.private.next.as_ref());

        TemplateValues {
            timer: format_timer(self.clock.current()),
            title,
            presenter,
            subtitle,
            next_title,
            next_presenter,
            next_subtitle,
        }
    }

    pub(super) fn broadcast_state(&self) {
        self.broadcaster
            .broadcast(ShowEvent::State(Box::new(self.snapshot())));
    }

    pub(super) fn broadcast_timer(&self) {
        self.broadcaster
            .broadcast(ShowEvent::Timer(self.clock.snapshot()));
    }

    pub(super) fn broadcast_rundown(&self) {
        self.broadcaster.broadcast(ShowEvent::RundownChanged {
            total: self.rundown.len(),
        });
    }
}

fn card_fields(card: Option<&TitleCard>) -> (String, String, String) {
    card.map(|c| (c.title.clone(), c.presenter.clone(), c.subtitle.clone()))
        .unwrap_or_default()
}
