//! Selection and title resolution
//!
//! Two title tracks are kept side by side. The private track always follows
//! the cue actually loaded. The public track only ever shows cues flagged
//! public: when the loaded cue is private, the nearest earlier public cue
//! stands in for it.

use showrun_common::events::{SelectionInfo, TitleCard, TitleTrack, Titles};
use showrun_common::CueEvent;

use super::selection::RollSelection;

/// Ids derived from the loaded cue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub index: Option<usize>,
    pub id: Option<String>,
    pub next_id: Option<String>,
    pub public_id: Option<String>,
    pub public_next_id: Option<String>,
}

impl Selection {
    pub fn is_loaded(&self) -> bool {
        self.index.is_some()
    }

    /// Broadcast view of the selection
    pub fn info(&self, total: usize) -> SelectionInfo {
        SelectionInfo {
            id: self.id.clone(),
            index: self.index,
            total,
        }
    }

    /// Whether `id` is the loaded cue or the one queued after it
    pub fn involves(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id) || self.next_id.as_deref() == Some(id)
    }
}

/// Selection together with the titles it resolves to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    pub selection: Selection,
    pub titles: Titles,
}

/// Resolve selection and titles for a manually loaded cue
///
/// Returns `None` when `index` is out of range.
pub fn resolve_for_index(rundown: &[CueEvent], index: usize) -> Option<Resolved> {
    let cue = rundown.get(index)?;

    let public_now = if cue.is_public {
        Some(cue)
    } else {
        rundown[..index].iter().rev().find(|c| c.is_public)
    };

    // One forward pass for both next tracks
    let mut next = None;
    let mut public_next = None;
    for candidate in &rundown[index + 1..] {
        if next.is_none() {
            next = Some(candidate);
        }
        if public_next.is_none() && candidate.is_public {
            public_next = Some(candidate);
        }
        if next.is_some() && public_next.is_some() {
            break;
        }
    }

    Some(build(Some((index, cue)), next, public_now, public_next))
}

/// Resolve selection and titles from a roll pass
pub fn resolve_for_roll(rundown: &[CueEvent], roll: &RollSelection) -> Resolved {
    let at = |index: Option<usize>| index.and_then(|i| rundown.get(i));

    let now = roll
        .now_index
        .and_then(|i| rundown.get(i).map(|cue| (i, cue)));

    build(
        now,
        at(roll.next_index),
        at(roll.public_index),
        at(roll.public_next_index),
    )
}

fn build(
    now: Option<(usize, &CueEvent)>,
    next: Option<&CueEvent>,
    public_now: Option<&CueEvent>,
    public_next: Option<&CueEvent>,
) -> Resolved {
    let id_of = |cue: Option<&CueEvent>| cue.map(|c| c.id.clone());

    let selection = Selection {
        index: now.map(|(i, _)| i),
        id: now.map(|(_, cue)| cue.id.clone()),
        next_id: id_of(next),
        public_id: id_of(public_now),
        public_next_id: id_of(public_next),
    };

    let titles = Titles {
        private: track(now.map(|(_, cue)| cue), next, TitleCard::private),
        public: track(public_now, public_next, TitleCard::public),
    };

    Resolved { selection, titles }
}

fn track(
    now: Option<&CueEvent>,
    next: Option<&CueEvent>,
    card: fn(&CueEvent) -> TitleCard,
) -> TitleTrack {
    TitleTrack {
        now_id: now.map(|c| c.id.clone()),
        now: now.map(card),
        next_id: next.map(|c| c.id.clone()),
        next: next.map(card),
    }
}
