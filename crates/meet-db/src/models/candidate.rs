//! Candidate place database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for candidate_places table
#[derive(Debug, Clone, FromRow)]
pub struct CandidateModel {
    pub meeting_id: String,
    pub place_id: String,
    pub name: String,
    pub category: String,
    pub lat: f64,
    pub lng: f64,
    pub rating: Option<f64>,
    pub added_by_id: String,
    pub added_by_name: String,
    pub added_at: DateTime<Utc>,
}
