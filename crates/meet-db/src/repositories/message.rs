//! PostgreSQL implementation of MessageRepository
//!
//! Reactions live in their own table, one row per (emoji, user). Replacing a
//! message's set deletes and reinserts those rows in one transaction.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use meet_core::entities::{ChatMessage, ReactionSet};
use meet_core::error::DomainError;
use meet_core::traits::{MessageRepository, RepoResult};
use meet_core::value_objects::{MeetingId, MessageId};

use crate::mappers::message_with_reactions;
use crate::models::{MessageModel, ReactionModel};

use super::error::{map_db_error, map_foreign_key_violation};

#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn reactions_for(&self, ids: &[Uuid]) -> RepoResult<Vec<ReactionModel>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT message_id, emoji, user_id
            FROM message_reactions
            WHERE message_id = ANY($1)
            ORDER BY message_id, emoji, ordinal
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(
        &self,
        meeting_id: &MeetingId,
        id: MessageId,
    ) -> RepoResult<Option<ChatMessage>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, meeting_id, author_id, author_name, content, created_at
            FROM chat_messages
            WHERE id = $1 AND meeting_id = $2
            "#,
        )
        .bind(id.into_inner())
        .bind(meeting_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        let Some(model) = result else {
            return Ok(None);
        };

        let reactions = self.reactions_for(&[model.id]).await?;
        Ok(Some(message_with_reactions(model, reactions)))
    }

    #[instrument(skip(self))]
    async fn find_by_meeting(
        &self,
        meeting_id: &MeetingId,
        limit: usize,
    ) -> RepoResult<Vec<ChatMessage>> {
        let limit = i64::try_from(limit.clamp(1, 500)).unwrap_or(500);

        // Newest page first, then flipped so callers get chronological order
        let mut models = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, meeting_id, author_id, author_name, content, created_at
            FROM chat_messages
            WHERE meeting_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(meeting_id.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;
        models.reverse();

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let reactions = self.reactions_for(&ids).await?;

        Ok(models
            .into_iter()
            .map(|model| {
                let own = reactions
                    .iter()
                    .filter(|r| r.message_id == model.id)
                    .cloned()
                    .collect();
                message_with_reactions(model, own)
            })
            .collect())
    }

    #[instrument(skip(self, message), fields(meeting_id = %message.meeting_id, message_id = %message.id))]
    async fn create(&self, message: &ChatMessage) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, meeting_id, author_id, author_name, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id.into_inner())
        .bind(message.meeting_id.as_str())
        .bind(message.author.id.as_str())
        .bind(&message.author.name)
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_foreign_key_violation(e, || DomainError::MeetingNotFound(message.meeting_id.clone()))
        })?;

        Ok(())
    }

    #[instrument(skip(self, reactions))]
    async fn update_reactions(&self, id: MessageId, reactions: &ReactionSet) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            DELETE FROM message_reactions WHERE message_id = $1
            "#,
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        for (ordinal, (emoji, user_id)) in reactions.pairs().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO message_reactions (message_id, emoji, user_id, ordinal)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(id.into_inner())
            .bind(emoji)
            .bind(user_id.as_str())
            .bind(i32::try_from(ordinal).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_foreign_key_violation(e, || DomainError::MessageNotFound(id)))?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
