//! Candidate place entity <-> model mapper

use meet_core::entities::{Actor, CandidatePlace};
use meet_core::value_objects::{Coordinates, MeetingId, PlaceId};

use crate::models::CandidateModel;

impl From<CandidateModel> for CandidatePlace {
    fn from(model: CandidateModel) -> Self {
        CandidatePlace {
            meeting_id: MeetingId::new(model.meeting_id),
            place_id: PlaceId::new(model.place_id),
            name: model.name,
            category: model.category,
            // Stored rows were validated on insert
            coordinates: Coordinates {
                lat: model.lat,
                lng: model.lng,
            },
            rating: model.rating,
            added_by: Actor::new(model.added_by_id, model.added_by_name),
            added_at: model.added_at,
        }
    }
}
