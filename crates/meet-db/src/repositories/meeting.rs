//! PostgreSQL implementation of MeetingRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use meet_core::entities::Meeting;
use meet_core::error::DomainError;
use meet_core::traits::{MeetingRepository, RepoResult};
use meet_core::value_objects::MeetingId;

use crate::models::MeetingModel;

use super::error::{map_db_error, map_unique_violation};

#[derive(Clone)]
pub struct PgMeetingRepository {
    pool: PgPool,
}

impl PgMeetingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MeetingRepository for PgMeetingRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &MeetingId) -> RepoResult<Option<Meeting>> {
        let result = sqlx::query_as::<_, MeetingModel>(
            r#"
            SELECT id, organizer_id, created_at
            FROM meetings
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Meeting::from))
    }

    #[instrument(skip(self, meeting), fields(meeting_id = %meeting.id))]
    async fn create(&self, meeting: &Meeting) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO meetings (id, organizer_id, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(meeting.id.as_str())
        .bind(meeting.organizer_id.as_str())
        .bind(meeting.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::MeetingAlreadyExists(meeting.id.clone()))
        })?;

        Ok(())
    }
}
