//! Meeting database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for meetings table
#[derive(Debug, Clone, FromRow)]
pub struct MeetingModel {
    pub id: String,
    pub organizer_id: String,
    pub created_at: DateTime<Utc>,
}
