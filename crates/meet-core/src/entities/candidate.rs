//! Candidate place entity - a venue proposed for a meeting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Actor;
use crate::value_objects::{Coordinates, MeetingId, PlaceId, UserId};

/// Candidate place entity
///
/// `(meeting_id, place_id)` is unique: a place is proposed at most once per meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePlace {
    pub meeting_id: MeetingId,
    pub place_id: PlaceId,
    pub name: String,
    pub category: String,
    pub coordinates: Coordinates,
    pub rating: Option<f64>,
    pub added_by: Actor,
    pub added_at: DateTime<Utc>,
}

impl CandidatePlace {
    /// Create a new CandidatePlace proposed now
    pub fn new(meeting_id: MeetingId, place: PlaceDetails, proposer: Actor) -> Self {
        Self {
            meeting_id,
            place_id: place.place_id,
            name: place.name,
            category: place.category,
            coordinates: place.coordinates,
            rating: place.rating,
            added_by: proposer,
            added_at: Utc::now(),
        }
    }

    /// Check whether a user proposed this place
    #[inline]
    pub fn is_proposed_by(&self, user_id: &UserId) -> bool {
        &self.added_by.id == user_id
    }
}

/// The venue attributes a client submits when proposing a place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub place_id: PlaceId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub rating: Option<f64>,
}
