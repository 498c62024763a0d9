//! Meeting entity - the external scope all consensus state hangs off

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{MeetingId, UserId};

/// Meeting entity
///
/// Owned by an external collaborator; this core only needs to know who organizes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: MeetingId,
    pub organizer_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Meeting {
    pub fn new(id: MeetingId, organizer_id: UserId) -> Self {
        Self {
            id,
            organizer_id,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_organizer(&self, user_id: &UserId) -> bool {
        &self.organizer_id == user_id
    }
}
