//! PostgreSQL implementation of VoteRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use meet_core::entities::Vote;
use meet_core::error::DomainError;
use meet_core::traits::{RepoResult, VoteRepository};
use meet_core::value_objects::{MeetingId, UserId};

use crate::models::VoteModel;

use super::error::{map_db_error, map_foreign_key_violation};

#[derive(Clone)]
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for PgVoteRepository {
    #[instrument(skip(self))]
    async fn find_by_voter(
        &self,
        meeting_id: &MeetingId,
        voter_id: &UserId,
    ) -> RepoResult<Option<Vote>> {
        let result = sqlx::query_as::<_, VoteModel>(
            r#"
            SELECT meeting_id, voter_id, voter_name, place_id, voted_at
            FROM votes
            WHERE meeting_id = $1 AND voter_id = $2
            "#,
        )
        .bind(meeting_id.as_str())
        .bind(voter_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Vote::from))
    }

    #[instrument(skip(self))]
    async fn find_by_meeting(&self, meeting_id: &MeetingId) -> RepoResult<Vec<Vote>> {
        let results = sqlx::query_as::<_, VoteModel>(
            r#"
            SELECT meeting_id, voter_id, voter_name, place_id, voted_at
            FROM votes
            WHERE meeting_id = $1
            ORDER BY voted_at
            "#,
        )
        .bind(meeting_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Vote::from).collect())
    }

    #[instrument(skip(self, vote), fields(meeting_id = %vote.meeting_id, voter_id = %vote.voter_id))]
    async fn create(&self, vote: &Vote) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO votes (meeting_id, voter_id, voter_name, place_id, voted_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(vote.meeting_id.as_str())
        .bind(vote.voter_id.as_str())
        .bind(&vote.voter_name)
        .bind(vote.place_id.as_str())
        .bind(vote.voted_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_foreign_key_violation(e, || DomainError::CandidateNotFound(vote.place_id.clone()))
        })?;

        Ok(())
    }

    #[instrument(skip(self, vote), fields(meeting_id = %vote.meeting_id, voter_id = %vote.voter_id))]
    async fn update(&self, vote: &Vote) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE votes
            SET place_id = $3, voter_name = $4, voted_at = $5
            WHERE meeting_id = $1 AND voter_id = $2
            "#,
        )
        .bind(vote.meeting_id.as_str())
        .bind(vote.voter_id.as_str())
        .bind(vote.place_id.as_str())
        .bind(&vote.voter_name)
        .bind(vote.voted_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_foreign_key_violation(e, || DomainError::CandidateNotFound(vote.place_id.clone()))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::VoteNotFound(vote.voter_id.clone()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, meeting_id: &MeetingId, voter_id: &UserId) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM votes WHERE meeting_id = $1 AND voter_id = $2
            "#,
        )
        .bind(meeting_id.as_str())
        .bind(voter_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
