//! Selection event entity - append-only record of a participant being chosen

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Actor;
use crate::value_objects::{MeetingId, UserId};

/// Selection event entity
///
/// Never mutated or deleted once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEvent {
    pub meeting_id: MeetingId,
    pub participant_id: UserId,
    pub participant_name: String,
    pub selected_at: DateTime<Utc>,
}

impl SelectionEvent {
    /// Create a new SelectionEvent recorded now
    pub fn new(meeting_id: MeetingId, participant: Actor) -> Self {
        Self {
            meeting_id,
            participant_id: participant.id,
            participant_name: participant.name,
            selected_at: Utc::now(),
        }
    }
}

/// How many times one participant has been selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionCount {
    pub participant_id: UserId,
    pub participant_name: String,
    pub count: usize,
    pub last_selected_at: DateTime<Utc>,
}

/// Aggregate events into per-participant counts
///
/// Sorted by count descending, then by first selection. The most recent name
/// wins when a participant was recorded under several names.
pub fn selection_counts(events: &[SelectionEvent]) -> Vec<SelectionCount> {
    let mut ordered: Vec<&SelectionEvent> = events.iter().collect();
    ordered.sort_by(|a, b| a.selected_at.cmp(&b.selected_at));

    let mut counts: Vec<SelectionCount> = Vec::new();
    for event in ordered {
        if let Some(entry) = counts
            .iter_mut()
            .find(|c| c.participant_id == event.participant_id)
        {
            entry.count += 1;
            entry.participant_name.clone_from(&event.participant_name);
            entry.last_selected_at = event.selected_at;
        } else {
            counts.push(SelectionCount {
                participant_id: event.participant_id.clone(),
                participant_name: event.participant_name.clone(),
                count: 1,
                last_selected_at: event.selected_at,
            });
        }
    }

    // Stable: equal counts keep first-selection order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
