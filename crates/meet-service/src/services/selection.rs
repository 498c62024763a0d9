//! Selection service
//!
//! Append-only record of who was picked (who pays, who chooses next) and the
//! per-participant counts derived from it.

use tracing::{info, instrument};

use meet_core::events::SelectionRecordedEvent;
use meet_core::{selection_counts, Actor, DomainError, DomainEvent, MeetingId, SelectionCount, SelectionEvent};

use crate::dto::SelectionResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Selection service
pub struct SelectionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SelectionService<'a> {
    /// Create a new SelectionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record that a participant was selected
    #[instrument(skip(self, participant), fields(participant_id = %participant.id))]
    pub async fn record_selection(
        &self,
        meeting_id: &MeetingId,
        participant: Actor,
    ) -> ServiceResult<SelectionResponse> {
        if participant.id.is_blank() {
            return Err(ServiceError::validation("participant id must not be empty"));
        }

        self.require_meeting(meeting_id).await?;
        let _guard = self.ctx.locks().lock(meeting_id).await;

        let selection = SelectionEvent::new(meeting_id.clone(), participant);
        self.ctx.selection_repo().append(&selection).await?;

        let events = self.ctx.selection_repo().find_by_meeting(meeting_id).await?;
        let counts = selection_counts(&events);

        info!(
            meeting_id = %meeting_id,
            participant_id = %selection.participant_id,
            total = events.len(),
            "Selection recorded"
        );

        self.ctx.publisher().publish(
            &DomainEvent::SelectionRecorded(SelectionRecordedEvent {
                selection: selection.clone(),
                counts: counts.clone(),
            }),
            None,
        );

        Ok(SelectionResponse { selection, counts })
    }

    /// Per-participant counts, most selected first
    #[instrument(skip(self))]
    pub async fn selection_stats(&self, meeting_id: &MeetingId) -> ServiceResult<Vec<SelectionCount>> {
        self.require_meeting(meeting_id).await?;
        let events = self.ctx.selection_repo().find_by_meeting(meeting_id).await?;
        Ok(selection_counts(&events))
    }

    async fn require_meeting(&self, meeting_id: &MeetingId) -> ServiceResult<()> {
        match self.ctx.meeting_repo().find_by_id(meeting_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::MeetingNotFound(meeting_id.clone()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, context_with_meeting};
    use meet_core::UserId;

    #[tokio::test]
    async fn test_counts_accumulate() {
        let (ctx, publisher) = context_with_meeting().await;
        let service = SelectionService::new(&ctx);
        let meeting = MeetingId::new("m1");

        service.record_selection(&meeting, Actor::new("u1", "Alice")).await.unwrap();
        service.record_selection(&meeting, Actor::new("u2", "Bob")).await.unwrap();
        let response = service
            .record_selection(&meeting, Actor::new("u2", "Bobby"))
            .await
            .unwrap();

        assert_eq!(response.counts[0].participant_id, UserId::new("u2"));
        assert_eq!(response.counts[0].count, 2);
        assert_eq!(response.counts[0].participant_name, "Bobby");
        assert_eq!(response.counts[1].count, 1);

        assert_eq!(service.selection_stats(&meeting).await.unwrap(), response.counts);
        assert_eq!(publisher.types(), vec!["selection-recorded"; 3]);
    }

    #[tokio::test]
    async fn test_unknown_meeting() {
        let (ctx, _) = context();
        let err = SelectionService::new(&ctx)
            .record_selection(&MeetingId::new("nope"), Actor::new("u1", "Alice"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
