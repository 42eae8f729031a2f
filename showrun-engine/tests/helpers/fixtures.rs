//! Rundown fixtures

use showrun_common::CueEvent;

/// Private cue with title `Cue <id>`
pub fn cue(id: &str, start: i64, end: i64) -> CueEvent {
    CueEvent {
        id: id.to_string(),
        time_start: start,
        time_end: end,
        title: format!("Cue {}", id),
        presenter: format!("Presenter {}", id),
        ..Default::default()
    }
}

pub fn public_cue(id: &str, start: i64, end: i64) -> CueEvent {
    CueEvent {
        is_public: true,
        ..cue(id, start, end)
    }
}

/// a: 0-60s, b: 60-120s (public), c: 180-240s
pub fn three_cue_rundown() -> Vec<CueEvent> {
    vec![
        cue("a", 0, 60_000),
        public_cue("b", 60_000, 120_000),
        cue("c", 180_000, 240_000),
    ]
}
