//! PostgreSQL implementation of CandidateRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use meet_core::entities::CandidatePlace;
use meet_core::error::DomainError;
use meet_core::traits::{CandidateRepository, RepoResult};
use meet_core::value_objects::{MeetingId, PlaceId};

use crate::models::CandidateModel;

use super::error::{map_db_error, map_foreign_key_violation, map_unique_violation};

#[derive(Clone)]
pub struct PgCandidateRepository {
    pool: PgPool,
}

impl PgCandidateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateRepository for PgCandidateRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        meeting_id: &MeetingId,
        place_id: &PlaceId,
    ) -> RepoResult<Option<CandidatePlace>> {
        let result = sqlx::query_as::<_, CandidateModel>(
            r#"
            SELECT meeting_id, place_id, name, category, lat, lng, rating,
                   added_by_id, added_by_name, added_at
            FROM candidate_places
            WHERE meeting_id = $1 AND place_id = $2
            "#,
        )
        .bind(meeting_id.as_str())
        .bind(place_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(CandidatePlace::from))
    }

    #[instrument(skip(self))]
    async fn find_by_meeting(&self, meeting_id: &MeetingId) -> RepoResult<Vec<CandidatePlace>> {
        let results = sqlx::query_as::<_, CandidateModel>(
            r#"
            SELECT meeting_id, place_id, name, category, lat, lng, rating,
                   added_by_id, added_by_name, added_at
            FROM candidate_places
            WHERE meeting_id = $1
            ORDER BY added_at, place_id
            "#,
        )
        .bind(meeting_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(CandidatePlace::from).collect())
    }

    #[instrument(skip(self, candidate), fields(meeting_id = %candidate.meeting_id, place_id = %candidate.place_id))]
    async fn create(&self, candidate: &CandidatePlace) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO candidate_places (
                meeting_id, place_id, name, category, lat, lng, rating,
                added_by_id, added_by_name, added_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(candidate.meeting_id.as_str())
        .bind(candidate.place_id.as_str())
        .bind(&candidate.name)
        .bind(&candidate.category)
        .bind(candidate.coordinates.lat)
        .bind(candidate.coordinates.lng)
        .bind(candidate.rating)
        .bind(candidate.added_by.id.as_str())
        .bind(&candidate.added_by.name)
        .bind(candidate.added_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|d| d.is_foreign_key_violation()) {
                return map_foreign_key_violation(e, || {
                    DomainError::MeetingNotFound(candidate.meeting_id.clone())
                });
            }
            map_unique_violation(e, || DomainError::DuplicateCandidate(candidate.place_id.clone()))
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_with_votes(
        &self,
        meeting_id: &MeetingId,
        place_id: &PlaceId,
    ) -> RepoResult<Option<u64>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let votes = sqlx::query(
            r#"
            DELETE FROM votes WHERE meeting_id = $1 AND place_id = $2
            "#,
        )
        .bind(meeting_id.as_str())
        .bind(place_id.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let candidate = sqlx::query(
            r#"
            DELETE FROM candidate_places WHERE meeting_id = $1 AND place_id = $2
            "#,
        )
        .bind(meeting_id.as_str())
        .bind(place_id.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if candidate.rows_affected() == 0 {
            // Nothing to remove; dropping the transaction rolls it back
            return Ok(None);
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(Some(votes.rows_affected()))
    }
}
