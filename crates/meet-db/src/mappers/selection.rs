//! Selection event entity <-> model mapper

use meet_core::entities::SelectionEvent;
use meet_core::value_objects::{MeetingId, UserId};

use crate::models::SelectionModel;

impl From<SelectionModel> for SelectionEvent {
    fn from(model: SelectionModel) -> Self {
        SelectionEvent {
            meeting_id: MeetingId::new(model.meeting_id),
            participant_id: UserId::new(model.participant_id),
            participant_name: model.participant_name,
            selected_at: model.selected_at,
        }
    }
}
