//! Vote entity - a participant's single endorsement of a candidate place

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Actor;
use crate::value_objects::{MeetingId, PlaceId, UserId};

/// Vote entity
///
/// `(meeting_id, voter_id)` is unique: one active vote per participant per meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub meeting_id: MeetingId,
    pub place_id: PlaceId,
    pub voter_id: UserId,
    pub voter_name: String,
    pub voted_at: DateTime<Utc>,
}

impl Vote {
    /// Create a new Vote cast now
    pub fn new(meeting_id: MeetingId, place_id: PlaceId, voter: Actor) -> Self {
        Self {
            meeting_id,
            place_id,
            voter_id: voter.id,
            voter_name: voter.name,
            voted_at: Utc::now(),
        }
    }

    /// Point this vote at another place, keeping the voter
    pub fn retarget(&mut self, place_id: PlaceId) {
        self.place_id = place_id;
        self.voted_at = Utc::now();
    }
}

/// What a cast-vote request did to the voter's ballot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteAction {
    /// No previous vote; one was inserted
    Cast,
    /// Previous vote pointed elsewhere; it now points at the new place
    Changed,
    /// Previous vote pointed at the same place; it was retracted
    Retracted,
}

/// A voter as listed in a tally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyVoter {
    pub voter_id: UserId,
    pub voter_name: String,
    pub voted_at: DateTime<Utc>,
}

/// Votes grouped per place, voters ordered by vote time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteTally(BTreeMap<PlaceId, Vec<TallyVoter>>);

impl VoteTally {
    /// Build a tally from a flat list of votes
    pub fn from_votes(votes: impl IntoIterator<Item = Vote>) -> Self {
        let mut tally: BTreeMap<PlaceId, Vec<TallyVoter>> = BTreeMap::new();
        for vote in votes {
            tally.entry(vote.place_id).or_default().push(TallyVoter {
                voter_id: vote.voter_id,
                voter_name: vote.voter_name,
                voted_at: vote.voted_at,
            });
        }
        for voters in tally.values_mut() {
            voters.sort_by(|a, b| a.voted_at.cmp(&b.voted_at));
        }
        Self(tally)
    }

    /// Voters for one place, empty when nobody voted for it
    pub fn voters(&self, place_id: &PlaceId) -> &[TallyVoter] {
        self.0.get(place_id).map_or(&[], Vec::as_slice)
    }

    /// Number of votes for one place
    pub fn count(&self, place_id: &PlaceId) -> usize {
        self.voters(place_id).len()
    }

    /// Total votes across all places
    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Check whether a user currently votes for the place
    pub fn has_voter(&self, place_id: &PlaceId, voter_id: &UserId) -> bool {
        self.voters(place_id).iter().any(|v| &v.voter_id == voter_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlaceId, &Vec<TallyVoter>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
