//! Vote database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for votes table
#[derive(Debug, Clone, FromRow)]
pub struct VoteModel {
    pub meeting_id: String,
    pub voter_id: String,
    pub voter_name: String,
    pub place_id: String,
    pub voted_at: DateTime<Utc>,
}
