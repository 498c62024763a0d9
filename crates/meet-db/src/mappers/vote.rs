//! Vote entity <-> model mapper

use meet_core::entities::Vote;
use meet_core::value_objects::{MeetingId, PlaceId, UserId};

use crate::models::VoteModel;

impl From<VoteModel> for Vote {
    fn from(model: VoteModel) -> Self {
        Vote {
            meeting_id: MeetingId::new(model.meeting_id),
            place_id: PlaceId::new(model.place_id),
            voter_id: UserId::new(model.voter_id),
            voter_name: model.voter_name,
            voted_at: model.voted_at,
        }
    }
}
