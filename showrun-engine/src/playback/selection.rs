//! Time-of-day cue selection for roll mode
//!
//! Given the rundown and the current time of day, decide which cue is
//! running, which comes next, and the equivalents restricted to public cues.
//! The function is pure: the same inputs always give the same result.

use showrun_common::time::day_adjusted_end;
use showrun_common::CueEvent;

/// Timing of the cue selected as running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollTimers {
    pub started_at: i64,
    /// Day-adjusted end
    pub finish_at: i64,
    pub duration: i64,
    pub current: i64,
}

/// Result of one roll pass
///
/// Indices are positions in the input slice, whatever the scan order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RollSelection {
    pub now_index: Option<usize>,
    pub now_id: Option<String>,
    /// Running public cue, or the most recently finished one
    pub public_index: Option<usize>,
    pub next_index: Option<usize>,
    pub public_next_index: Option<usize>,
    pub timers: Option<RollTimers>,
    /// Wait until the next cue's start; negative when an overlapping cue
    /// has already started but is not the running one
    pub time_to_next: Option<i64>,
}

/// Select running and next cues for time of day `now`
pub fn select_by_roll(events: &[CueEvent], now: i64) -> RollSelection {
    let mut result = RollSelection::default();

    // Nothing left to roll into once the last cue of the day is over
    let Some(last) = events.last() else {
        return result;
    };
    if now > day_adjusted_end(last.time_start, last.time_end) {
        return result;
    }

    let mut last_public_end = i64::MIN;
    let mut next_wait = i64::MAX;
    let mut public_next_wait = i64::MAX;

    for index in scan_order(events) {
        let event = &events[index];
        let end = day_adjusted_end(event.time_start, event.time_end);

        if end <= now {
            if event.is_public && end > last_public_end {
                last_public_end = end;
                result.public_index = Some(index);
            }
        } else if result.now_index.is_none() && now >= event.time_start {
            result.now_index = Some(index);
            result.now_id = Some(event.id.clone());
            result.timers = Some(RollTimers {
                started_at: event.time_start,
                finish_at: end,
                duration: end - event.time_start,
                current: end - now,
            });
            if event.is_public {
                last_public_end = end;
                result.public_index = Some(index);
            }
        } else {
            let wait = event.time_start - now;
            if wait < next_wait {
                next_wait = wait;
                result.next_index = Some(index);
            }
            if event.is_public && wait < public_next_wait {
                public_next_wait = wait;
                result.public_next_index = Some(index);
            }
            if result.next_index.is_some() && result.public_next_index.is_some() {
                break;
            }
        }
    }

    result.time_to_next = result
        .next_index
        .and_then(|index| events.get(index))
        .map(|event| event.time_start - now);

    result
}

/// Indices in scan order: ascending start time, later rundown entries first
/// among cues that share a start time
fn scan_order(events: &[CueEvent]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..events.len()).collect();
    order.sort_by(|&a, &b| {
        events[a]
            .time_start
            .cmp(&events[b].time_start)
            .then_with(|| b.cmp(&a))
    });
    order
}
