//! Meeting entity <-> model mapper

use meet_core::entities::Meeting;
use meet_core::value_objects::{MeetingId, UserId};

use crate::models::MeetingModel;

impl From<MeetingModel> for Meeting {
    fn from(model: MeetingModel) -> Self {
        Meeting {
            id: MeetingId::new(model.id),
            organizer_id: UserId::new(model.organizer_id),
            created_at: model.created_at,
        }
    }
}
