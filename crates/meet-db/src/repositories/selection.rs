//! PostgreSQL implementation of SelectionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use meet_core::entities::SelectionEvent;
use meet_core::error::DomainError;
use meet_core::traits::{RepoResult, SelectionRepository};
use meet_core::value_objects::MeetingId;

use crate::models::SelectionModel;

use super::error::{map_db_error, map_foreign_key_violation};

#[derive(Clone)]
pub struct PgSelectionRepository {
    pool: PgPool,
}

impl PgSelectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SelectionRepository for PgSelectionRepository {
    #[instrument(skip(self, event), fields(meeting_id = %event.meeting_id))]
    async fn append(&self, event: &SelectionEvent) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO selection_events (meeting_id, participant_id, participant_name, selected_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(event.meeting_id.as_str())
        .bind(event.participant_id.as_str())
        .bind(&event.participant_name)
        .bind(event.selected_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_foreign_key_violation(e, || DomainError::MeetingNotFound(event.meeting_id.clone()))
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_meeting(&self, meeting_id: &MeetingId) -> RepoResult<Vec<SelectionEvent>> {
        let results = sqlx::query_as::<_, SelectionModel>(
            r#"
            SELECT id, meeting_id, participant_id, participant_name, selected_at
            FROM selection_events
            WHERE meeting_id = $1
            ORDER BY selected_at, id
            "#,
        )
        .bind(meeting_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(SelectionEvent::from).collect())
    }
}
