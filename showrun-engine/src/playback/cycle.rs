//! Playback lifecycle tables
//!
//! Two tables drive the engine's lifecycle:
//! - [`next_phase`]: the transition table, a pure function of the current
//!   phase and a [`CycleContext`] describing the clock and load state.
//! - [`dispatch_entry`]: what each phase emits when it is entered (OSC key,
//!   whether its HTTP trigger applies, broadcast weight).
//!
//! ```text
//! idle → onLoad → armed → onStart → onUpdate ⟲ (every tick)
//!                   ↑                  │ │ │
//!                   └──── onPause ─────┘ │ └─→ onFinish → onUpdate
//!                                        └───→ onStop → idle
//! ```

use showrun_common::events::{CyclePhase, TimerState};

use crate::integrations::OscKey;

/// Inputs to one transition step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleContext {
    /// A cue was (re)loaded and `onLoad` has not run for it yet
    pub load_pending: bool,
    /// A cue is selected
    pub loaded: bool,
    pub timer_state: TimerState,
    /// The clock's one-shot finished flag is raised
    pub finished: bool,
    /// First step of a tick evaluation; lets `onUpdate` re-enter itself
    pub tick_reentry: bool,
}

/// Transition table
///
/// Returns `None` when the phase is stable for this context.
pub fn next_phase(phase: CyclePhase, ctx: &CycleContext) -> Option<CyclePhase> {
    use CyclePhase::*;

    if ctx.load_pending {
        return Some(OnLoad);
    }
    if !ctx.loaded && !matches!(phase, Idle | OnStop) {
        return Some(OnStop);
    }

    match phase {
        Idle => None,
        OnLoad => Some(Armed),
        Armed => ctx.timer_state.is_running().then_some(OnStart),
        OnStart => Some(OnUpdate),
        OnUpdate => {
            if ctx.finished {
                Some(OnFinish)
            } else {
                match ctx.timer_state {
                    TimerState::Pause => Some(OnPause),
                    TimerState::Stop => Some(OnStop),
                    TimerState::Start | TimerState::Roll => ctx.tick_reentry.then_some(OnUpdate),
                }
            }
        }
        OnPause => Some(Armed),
        OnStop => Some(Idle),
        OnFinish => Some(OnUpdate),
    }
}

/// How much state a phase broadcasts on entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastKind {
    None,
    /// Timer snapshot only (tick path)
    Timer,
    /// Complete engine state
    Full,
}

/// Side effects of entering a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchEntry {
    pub osc: Option<OscKey>,
    /// Whether this phase's own HTTP trigger is consulted
    pub http: bool,
    pub broadcast: BroadcastKind,
}

/// Dispatch table
///
/// For `onUpdate` the engine swaps `time` for `overtime` once the countdown
/// is negative.
pub fn dispatch_entry(phase: CyclePhase) -> DispatchEntry {
    use CyclePhase::*;

    let (osc, http, broadcast) = match phase {
        Idle | Armed => (None, false, BroadcastKind::None),
        OnLoad => (Some(OscKey::Title), true, BroadcastKind::Full),
        OnStart => (Some(OscKey::Play), true, BroadcastKind::Full),
        OnUpdate => (Some(OscKey::Time), true, BroadcastKind::Timer),
        OnPause => (Some(OscKey::Pause), true, BroadcastKind::Full),
        OnStop => (Some(OscKey::Stop), true, BroadcastKind::Full),
        OnFinish => (Some(OscKey::Finished), true, BroadcastKind::Full),
    };
    DispatchEntry {
        osc,
        http,
        broadcast,
    }
}

/// Phases the engine can rest in between evaluations
pub fn is_resting(phase: CyclePhase) -> bool {
    matches!(phase, CyclePhase::Idle | CyclePhase::Armed | CyclePhase::OnUpdate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use CyclePhase::*;

    fn ctx(loaded: bool, timer_state: TimerState) -> CycleContext {
        CycleContext {
            load_pending: false,
            loaded,
            timer_state,
            finished: false,
            tick_reentry: false,
        }
    }

    /// Follow transitions until stable, collecting entered phases
    fn settle(mut phase: CyclePhase, mut context: CycleContext) -> Vec<CyclePhase> {
        let mut entered = Vec::new();
        while let Some(next) = next_phase(phase, &context) {
            phase = next;
            entered.push(next);
            context.load_pending = false;
            context.tick_reentry = false;
            if next == OnFinish {
                context.finished = false;
            }
            assert!(entered.len() < 16, "transition loop: {:?}", entered);
        }
        entered
    }

    #[test]
    fn test_load_then_start() {
        let mut context = ctx(true, TimerState::Stop);
        context.load_pending = true;
        assert_eq!(settle(Idle, context), vec![OnLoad, Armed]);

        assert_eq!(settle(Armed, ctx(true, TimerState::Start)), vec![OnStart, OnUpdate]);
    }

    #[test]
    fn test_load_pending_wins_from_any_phase() {
        for phase in [Idle, Armed, OnUpdate, OnPause, OnStop, OnFinish] {
            let mut context = ctx(true, TimerState::Start);
            context.load_pending = true;
            assert_eq!(next_phase(phase, &context), Some(OnLoad));
        }
    }

    #[test]
    fn test_tick_reenters_update_once() {
        let mut context = ctx(true, TimerState::Start);
        context.tick_reentry = true;
        assert_eq!(settle(OnUpdate, context), vec![OnUpdate]);

        // Command-driven evaluation leaves a running engine alone
        assert_eq!(settle(OnUpdate, ctx(true, TimerState::Start)), vec![]);
    }

    #[test]
    fn test_pause_and_resume() {
        assert_eq!(settle(OnUpdate, ctx(true, TimerState::Pause)), vec![OnPause, Armed]);
        assert_eq!(settle(Armed, ctx(true, TimerState::Pause)), vec![]);
    }

    #[test]
    fn test_finish_returns_to_update() {
        let mut context = ctx(true, TimerState::Start);
        context.finished = true;
        assert_eq!(settle(OnUpdate, context), vec![OnFinish, OnUpdate]);
    }

    #[test]
    fn test_unloading_stops_from_any_active_phase() {
        for phase in [OnLoad, Armed, OnStart, OnUpdate, OnPause, OnFinish] {
            assert_eq!(settle(phase, ctx(false, TimerState::Stop)), vec![OnStop, Idle]);
        }
        assert_eq!(settle(Idle, ctx(false, TimerState::Stop)), vec![]);
    }

    #[test]
    fn test_roll_counts_as_running() {
        assert_eq!(settle(Armed, ctx(true, TimerState::Roll)), vec![OnStart, OnUpdate]);
    }

    #[test]
    fn test_resting_phases() {
        assert!(is_resting(Idle));
        assert!(is_resting(Armed));
        assert!(is_resting(OnUpdate));
        assert!(!is_resting(OnLoad));
        assert!(!is_resting(OnFinish));
    }

    #[test]
    fn test_dispatch_table() {
        assert_eq!(dispatch_entry(OnLoad).osc, Some(OscKey::Title));
        assert_eq!(dispatch_entry(OnStart).osc, Some(OscKey::Play));
        assert_eq!(dispatch_entry(OnUpdate).broadcast, BroadcastKind::Timer);
        assert_eq!(dispatch_entry(OnFinish).osc, Some(OscKey::Finished));
        assert_eq!(dispatch_entry(Armed).osc, None);
        assert!(!dispatch_entry(Idle).http);
        assert!(dispatch_entry(OnStop).http);
    }
}
