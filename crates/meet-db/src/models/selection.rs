//! Selection event database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for selection_events table
#[derive(Debug, Clone, FromRow)]
pub struct SelectionModel {
    pub id: i64,
    pub meeting_id: String,
    pub participant_id: String,
    pub participant_name: String,
    pub selected_at: DateTime<Utc>,
}
