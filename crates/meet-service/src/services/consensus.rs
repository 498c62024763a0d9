//! Consensus service
//!
//! Candidate places, votes, chat messages and reactions of a meeting. Every
//! mutation holds the meeting's write lock from the first read until its
//! event has been handed to the publisher.

use std::collections::HashSet;

use tracing::{debug, info, instrument};

use meet_core::events::{
    CandidateAddedEvent, CandidateRemovedEvent, MessageCreatedEvent, ReactionUpdatedEvent,
    VoteUpdatedEvent,
};
use meet_core::{
    Actor, CandidatePlace, ChatMessage, DomainError, DomainEvent, Meeting, MeetingId, MessageId,
    PlaceDetails, PlaceId, UserId, Vote, VoteAction, VoteTally,
};

use crate::dto::{CandidateRemovedResponse, ReactionResponse, VoteResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Maximum candidate name length in characters
pub const MAX_PLACE_NAME_LENGTH: usize = 100;

/// Maximum emoji length in characters
pub const MAX_EMOJI_LENGTH: usize = 32;

/// Default and maximum chat history page
pub const DEFAULT_MESSAGE_LIMIT: usize = 50;
pub const MAX_MESSAGE_LIMIT: usize = 100;

/// Consensus service
pub struct ConsensusService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ConsensusService<'a> {
    /// Create a new ConsensusService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Meetings
    // ========================================================================

    /// Register a meeting and its organizer
    ///
    /// Re-registering with the same organizer is a no-op returning the stored
    /// meeting; a different organizer is a conflict.
    #[instrument(skip(self))]
    pub async fn register_meeting(
        &self,
        meeting_id: MeetingId,
        organizer_id: UserId,
    ) -> ServiceResult<Meeting> {
        if meeting_id.is_blank() || organizer_id.is_blank() {
            return Err(ServiceError::validation(
                "meeting id and organizer id must not be empty",
            ));
        }

        let _guard = self.ctx.locks().lock(&meeting_id).await;

        if let Some(existing) = self.ctx.meeting_repo().find_by_id(&meeting_id).await? {
            if existing.is_organizer(&organizer_id) {
                return Ok(existing);
            }
            return Err(DomainError::MeetingAlreadyExists(meeting_id).into());
        }

        let meeting = Meeting::new(meeting_id, organizer_id);
        self.ctx.meeting_repo().create(&meeting).await?;

        info!(
            meeting_id = %meeting.id,
            organizer_id = %meeting.organizer_id,
            "Meeting registered"
        );

        Ok(meeting)
    }

    // ========================================================================
    // Candidates
    // ========================================================================

    /// Propose a place; returns the updated candidate list
    #[instrument(skip(self, place), fields(place_id = %place.place_id))]
    pub async fn add_candidate(
        &self,
        meeting_id: &MeetingId,
        place: PlaceDetails,
        proposer: Actor,
    ) -> ServiceResult<Vec<CandidatePlace>> {
        validate_place(&place)?;

        self.require_meeting(meeting_id).await?;
        let _guard = self.ctx.locks().lock(meeting_id).await;

        let candidate = CandidatePlace::new(meeting_id.clone(), place, proposer);
        self.ctx.candidate_repo().create(&candidate).await?;
        let candidates = self.ctx.candidate_repo().find_by_meeting(meeting_id).await?;

        info!(
            meeting_id = %meeting_id,
            place_id = %candidate.place_id,
            added_by = %candidate.added_by.id,
            "Candidate added"
        );

        self.publish(DomainEvent::CandidateAdded(CandidateAddedEvent {
            meeting_id: meeting_id.clone(),
            candidate,
            candidates: candidates.clone(),
        }));

        Ok(candidates)
    }

    /// Remove a place and every vote for it
    ///
    /// Only the organizer or the original proposer may remove a place.
    #[instrument(skip(self))]
    pub async fn remove_candidate(
        &self,
        meeting_id: &MeetingId,
        place_id: &PlaceId,
        requester_id: &UserId,
    ) -> ServiceResult<CandidateRemovedResponse> {
        let meeting = self.require_meeting(meeting_id).await?;
        let _guard = self.ctx.locks().lock(meeting_id).await;

        let candidate = self
            .ctx
            .candidate_repo()
            .find(meeting_id, place_id)
            .await?
            .ok_or_else(|| DomainError::CandidateNotFound(place_id.clone()))?;

        if !meeting.is_organizer(requester_id) && !candidate.is_proposed_by(requester_id) {
            return Err(DomainError::NotOrganizerOrProposer.into());
        }

        let removed_votes = self
            .ctx
            .candidate_repo()
            .delete_with_votes(meeting_id, place_id)
            .await?
            .ok_or_else(|| DomainError::CandidateNotFound(place_id.clone()))?;

        let candidates = self.ctx.candidate_repo().find_by_meeting(meeting_id).await?;
        let tally = self.reconciled_tally(meeting_id, &candidates).await?;

        info!(
            meeting_id = %meeting_id,
            place_id = %place_id,
            removed_by = %requester_id,
            removed_votes,
            "Candidate removed"
        );

        self.publish(DomainEvent::CandidateRemoved(CandidateRemovedEvent {
            meeting_id: meeting_id.clone(),
            place_id: place_id.clone(),
            removed_by: requester_id.clone(),
            removed_votes,
            candidates: candidates.clone(),
            tally: tally.clone(),
        }));

        Ok(CandidateRemovedResponse {
            place_id: place_id.clone(),
            removed_votes,
            candidates,
            tally,
        })
    }

    /// List the candidates of a meeting, oldest first
    #[instrument(skip(self))]
    pub async fn list_candidates(&self, meeting_id: &MeetingId) -> ServiceResult<Vec<CandidatePlace>> {
        self.require_meeting(meeting_id).await?;
        Ok(self.ctx.candidate_repo().find_by_meeting(meeting_id).await?)
    }

    // ========================================================================
    // Votes
    // ========================================================================

    /// Cast, change or retract the voter's single vote
    ///
    /// Voting for the place already voted for retracts the vote. Voting for a
    /// different place re-points the existing vote in place.
    #[instrument(skip(self, voter), fields(voter_id = %voter.id))]
    pub async fn cast_vote(
        &self,
        meeting_id: &MeetingId,
        place_id: &PlaceId,
        voter: Actor,
    ) -> ServiceResult<VoteResponse> {
        self.require_meeting(meeting_id).await?;
        let _guard = self.ctx.locks().lock(meeting_id).await;

        if self
            .ctx
            .candidate_repo()
            .find(meeting_id, place_id)
            .await?
            .is_none()
        {
            return Err(DomainError::CandidateNotFound(place_id.clone()).into());
        }

        let voter_id = voter.id.clone();
        let action = match self.ctx.vote_repo().find_by_voter(meeting_id, &voter_id).await? {
            None => {
                let vote = Vote::new(meeting_id.clone(), place_id.clone(), voter);
                self.ctx.vote_repo().create(&vote).await?;
                VoteAction::Cast
            }
            Some(existing) if &existing.place_id == place_id => {
                self.ctx.vote_repo().delete(meeting_id, &voter_id).await?;
                VoteAction::Retracted
            }
            Some(mut existing) => {
                existing.retarget(place_id.clone());
                existing.voter_name = voter.name;
                self.ctx.vote_repo().update(&existing).await?;
                VoteAction::Changed
            }
        };

        let candidates = self.ctx.candidate_repo().find_by_meeting(meeting_id).await?;
        let tally = self.reconciled_tally(meeting_id, &candidates).await?;

        info!(
            meeting_id = %meeting_id,
            place_id = %place_id,
            voter_id = %voter_id,
            action = ?action,
            "Vote updated"
        );

        self.publish(DomainEvent::VoteUpdated(VoteUpdatedEvent {
            meeting_id: meeting_id.clone(),
            place_id: place_id.clone(),
            voter_id,
            action,
            tally: tally.clone(),
        }));

        Ok(VoteResponse {
            action,
            place_id: place_id.clone(),
            tally,
        })
    }

    /// Current voters per place
    ///
    /// Votes whose candidate no longer exists are left out.
    #[instrument(skip(self))]
    pub async fn get_tally(&self, meeting_id: &MeetingId) -> ServiceResult<VoteTally> {
        self.require_meeting(meeting_id).await?;
        let candidates = self.ctx.candidate_repo().find_by_meeting(meeting_id).await?;
        self.reconciled_tally(meeting_id, &candidates).await
    }

    /// Candidates and the tally over exactly those candidates
    ///
    /// Both reads happen under the meeting lock, so no place removed between
    /// them can leave voters in the tally.
    #[instrument(skip(self))]
    pub async fn snapshot(
        &self,
        meeting_id: &MeetingId,
    ) -> ServiceResult<(Vec<CandidatePlace>, VoteTally)> {
        self.require_meeting(meeting_id).await?;
        let _guard = self.ctx.locks().lock(meeting_id).await;

        let candidates = self.ctx.candidate_repo().find_by_meeting(meeting_id).await?;
        let tally = self.reconciled_tally(meeting_id, &candidates).await?;
        Ok((candidates, tally))
    }

    // ========================================================================
    // Messages & Reactions
    // ========================================================================

    /// Post a chat message to the meeting
    #[instrument(skip(self, author, content), fields(author_id = %author.id))]
    pub async fn post_message(
        &self,
        meeting_id: &MeetingId,
        author: Actor,
        content: String,
    ) -> ServiceResult<ChatMessage> {
        let message = ChatMessage::new(meeting_id.clone(), author, content)?;

        self.require_meeting(meeting_id).await?;
        let _guard = self.ctx.locks().lock(meeting_id).await;

        self.ctx.message_repo().create(&message).await?;

        info!(
            meeting_id = %meeting_id,
            message_id = %message.id,
            author_id = %message.author.id,
            "Message created"
        );

        self.publish(DomainEvent::MessageCreated(MessageCreatedEvent {
            message: message.clone(),
        }));

        Ok(message)
    }

    /// Add the user's reaction, or remove it if already present
    #[instrument(skip(self))]
    pub async fn toggle_reaction(
        &self,
        meeting_id: &MeetingId,
        message_id: MessageId,
        emoji: &str,
        user_id: &UserId,
    ) -> ServiceResult<ReactionResponse> {
        let emoji = emoji.trim();
        let length = emoji.chars().count();
        if length == 0 || length > MAX_EMOJI_LENGTH {
            return Err(ServiceError::validation(format!(
                "emoji must be 1-{MAX_EMOJI_LENGTH} characters"
            )));
        }

        self.require_meeting(meeting_id).await?;
        let _guard = self.ctx.locks().lock(meeting_id).await;

        let mut message = self
            .ctx
            .message_repo()
            .find_by_id(meeting_id, message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        let change = message.reactions.toggle(emoji, user_id);
        self.ctx
            .message_repo()
            .update_reactions(message_id, &message.reactions)
            .await?;

        info!(
            meeting_id = %meeting_id,
            message_id = %message_id,
            user_id = %user_id,
            emoji = %emoji,
            change = ?change,
            "Reaction toggled"
        );

        self.publish(DomainEvent::ReactionUpdated(ReactionUpdatedEvent {
            meeting_id: meeting_id.clone(),
            message_id,
            emoji: emoji.to_string(),
            user_id: user_id.clone(),
            change,
            reactions: message.reactions.clone(),
        }));

        Ok(ReactionResponse {
            message_id,
            emoji: emoji.to_string(),
            change,
            reactions: message.reactions,
        })
    }

    /// Recent messages, oldest first
    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        meeting_id: &MeetingId,
        limit: Option<usize>,
    ) -> ServiceResult<Vec<ChatMessage>> {
        self.require_meeting(meeting_id).await?;
        let limit = limit
            .unwrap_or(DEFAULT_MESSAGE_LIMIT)
            .clamp(1, MAX_MESSAGE_LIMIT);
        Ok(self.ctx.message_repo().find_by_meeting(meeting_id, limit).await?)
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    async fn require_meeting(&self, meeting_id: &MeetingId) -> ServiceResult<Meeting> {
        self.ctx
            .meeting_repo()
            .find_by_id(meeting_id)
            .await?
            .ok_or_else(|| DomainError::MeetingNotFound(meeting_id.clone()).into())
    }

    async fn reconciled_tally(
        &self,
        meeting_id: &MeetingId,
        candidates: &[CandidatePlace],
    ) -> ServiceResult<VoteTally> {
        let places: HashSet<&PlaceId> = candidates.iter().map(|c| &c.place_id).collect();
        let votes = self.ctx.vote_repo().find_by_meeting(meeting_id).await?;
        let total = votes.len();

        let live: Vec<Vote> = votes
            .into_iter()
            .filter(|v| places.contains(&v.place_id))
            .collect();
        if live.len() != total {
            debug!(
                meeting_id = %meeting_id,
                orphaned = total - live.len(),
                "Ignoring votes for removed candidates"
            );
        }

        Ok(VoteTally::from_votes(live))
    }

    fn publish(&self, event: DomainEvent) {
        let delivered = self.ctx.publisher().publish(&event, None);
        debug!(event = event.event_type(), delivered, "Event published");
    }
}

/// Reject malformed place details before touching state
fn validate_place(place: &PlaceDetails) -> ServiceResult<()> {
    place.coordinates.validate()?;

    if place.place_id.is_blank() {
        return Err(ServiceError::validation("place id must not be empty"));
    }

    let name_length = place.name.trim().chars().count();
    if name_length == 0 || name_length > MAX_PLACE_NAME_LENGTH {
        return Err(ServiceError::validation(format!(
            "place name must be 1-{MAX_PLACE_NAME_LENGTH} characters"
        )));
    }

    if let Some(rating) = place.rating {
        if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
            return Err(ServiceError::validation(format!(
                "rating must be between 0 and 5, got {rating}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, context_with_meeting};
    use meet_core::{Coordinates, ReactionChange};

    fn meeting() -> MeetingId {
        MeetingId::new("m1")
    }

    fn place(id: &str) -> PlaceDetails {
        PlaceDetails {
            place_id: PlaceId::new(id),
            name: format!("Place {id}"),
            category: "cafe".to_string(),
            coordinates: Coordinates { lat: 37.53, lng: 127.02 },
            rating: Some(4.2),
        }
    }

    fn actor(id: &str) -> Actor {
        Actor::new(id, id.to_uppercase())
    }

    #[tokio::test]
    async fn test_register_meeting_is_idempotent_for_same_organizer() {
        let (ctx, _) = context();
        let service = ConsensusService::new(&ctx);

        let first = service.register_meeting(meeting(), UserId::new("org")).await.unwrap();
        let again = service.register_meeting(meeting(), UserId::new("org")).await.unwrap();
        assert_eq!(first, again);

        let err = service
            .register_meeting(meeting(), UserId::new("other"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_unknown_meeting_is_rejected() {
        let (ctx, publisher) = context();
        let service = ConsensusService::new(&ctx);

        let err = service
            .add_candidate(&meeting(), place("a"), actor("u1"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_MEETING");
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn test_lock_registry_does_not_grow() {
        let (ctx, _) = context_with_meeting().await;
        let service = ConsensusService::new(&ctx);

        for i in 0..1000 {
            let err = service
                .add_candidate(&MeetingId::new(format!("ghost-{i}")), place("a"), actor("u1"))
                .await
                .unwrap_err();
            assert_eq!(err.error_code(), "UNKNOWN_MEETING");
        }
        assert!(ctx.locks().is_empty());

        service.add_candidate(&meeting(), place("a"), actor("u1")).await.unwrap();
        service.cast_vote(&meeting(), &PlaceId::new("a"), actor("u1")).await.unwrap();
        assert!(ctx.locks().is_empty());
    }

    #[tokio::test]
    async fn test_add_candidate_broadcasts_list() {
        let (ctx, publisher) = context_with_meeting().await;
        let service = ConsensusService::new(&ctx);

        service.add_candidate(&meeting(), place("a"), actor("u1")).await.unwrap();
        let list = service.add_candidate(&meeting(), place("b"), actor("u2")).await.unwrap();

        let ids: Vec<_> = list.iter().map(|c| c.place_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(publisher.types(), vec!["candidate-added", "candidate-added"]);
        assert!(publisher.events().iter().all(|(_, exclude)| exclude.is_none()));
    }

    #[tokio::test]
    async fn test_duplicate_candidate_conflicts() {
        let (ctx, publisher) = context_with_meeting().await;
        let service = ConsensusService::new(&ctx);

        service.add_candidate(&meeting(), place("a"), actor("u1")).await.unwrap();
        let err = service
            .add_candidate(&meeting(), place("a"), actor("u2"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_CANDIDATE");
        assert_eq!(publisher.types().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_place_is_rejected_before_state() {
        let (ctx, _) = context_with_meeting().await;
        let service = ConsensusService::new(&ctx);

        let mut bad = place("a");
        bad.rating = Some(5.5);
        assert_eq!(
            service.add_candidate(&meeting(), bad, actor("u1")).await.unwrap_err().status_code(),
            400
        );

        let mut bad = place("a");
        bad.coordinates = Coordinates { lat: 95.0, lng: 0.0 };
        assert!(service.add_candidate(&meeting(), bad, actor("u1")).await.is_err());

        assert!(service.list_candidates(&meeting()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_vote_change_moves_voter() {
        let (ctx, _) = context_with_meeting().await;
        let service = ConsensusService::new(&ctx);
        service.add_candidate(&meeting(), place("A"), actor("u1")).await.unwrap();
        service.add_candidate(&meeting(), place("B"), actor("u1")).await.unwrap();
        service.cast_vote(&meeting(), &PlaceId::new("A"), actor("u2")).await.unwrap();

        let cast = service.cast_vote(&meeting(), &PlaceId::new("A"), actor("u1")).await.unwrap();
        assert_eq!(cast.action, VoteAction::Cast);
        let before = cast.tally.total();

        let changed = service.cast_vote(&meeting(), &PlaceId::new("B"), actor("u1")).await.unwrap();
        assert_eq!(changed.action, VoteAction::Changed);
        assert!(!changed.tally.has_voter(&PlaceId::new("A"), &UserId::new("u1")));
        assert!(changed.tally.has_voter(&PlaceId::new("B"), &UserId::new("u1")));
        assert_eq!(changed.tally.total(), before);
    }

    #[tokio::test]
    async fn test_same_vote_twice_retracts() {
        let (ctx, publisher) = context_with_meeting().await;
        let service = ConsensusService::new(&ctx);
        service.add_candidate(&meeting(), place("A"), actor("u1")).await.unwrap();

        service.cast_vote(&meeting(), &PlaceId::new("A"), actor("u1")).await.unwrap();
        let retracted = service.cast_vote(&meeting(), &PlaceId::new("A"), actor("u1")).await.unwrap();

        assert_eq!(retracted.action, VoteAction::Retracted);
        assert!(retracted.tally.is_empty());
        assert_eq!(publisher.types().last(), Some(&"vote-updated"));
    }

    #[tokio::test]
    async fn test_vote_for_unknown_candidate() {
        let (ctx, _) = context_with_meeting().await;
        let service = ConsensusService::new(&ctx);
        let err = service
            .cast_vote(&meeting(), &PlaceId::new("nope"), actor("u1"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "UNKNOWN_CANDIDATE");
    }

    #[tokio::test]
    async fn test_one_vote_per_voter_under_concurrency() {
        let (ctx, _) = context_with_meeting().await;
        let service = ConsensusService::new(&ctx);
        for id in ["A", "B", "C"] {
            service.add_candidate(&meeting(), place(id), actor("u1")).await.unwrap();
        }

        let mut handles = Vec::new();
        for id in ["A", "B", "C", "A", "B", "C"] {
            let ctx = ctx.clone();
            handles.push(tokio::spawn(async move {
                ConsensusService::new(&ctx)
                    .cast_vote(&MeetingId::new("m1"), &PlaceId::new(id), Actor::new("u9", "U9"))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let tally = service.get_tally(&meeting()).await.unwrap();
        let appearances = tally
            .iter()
            .flat_map(|(_, voters)| voters.iter())
            .filter(|v| v.voter_id == UserId::new("u9"))
            .count();
        assert!(appearances <= 1);
    }

    #[tokio::test]
    async fn test_snapshot_tally_matches_candidates() {
        let (ctx, _) = context_with_meeting().await;
        let service = ConsensusService::new(&ctx);
        for id in ["A", "B", "C"] {
            service.add_candidate(&meeting(), place(id), actor("u1")).await.unwrap();
        }

        let mut handles = Vec::new();
        for (i, id) in ["A", "B", "C", "A", "B", "C"].into_iter().enumerate() {
            let ctx = ctx.clone();
            handles.push(tokio::spawn(async move {
                let service = ConsensusService::new(&ctx);
                let voter = Actor::new(format!("v{i}"), "Voter");
                let _ = service.cast_vote(&MeetingId::new("m1"), &PlaceId::new(id), voter).await;
                let _ = service
                    .remove_candidate(&MeetingId::new("m1"), &PlaceId::new(id), &UserId::new("u1"))
                    .await;
            }));
        }

        for _ in 0..20 {
            let (candidates, tally) = service.snapshot(&meeting()).await.unwrap();
            for (place_id, _) in tally.iter() {
                assert!(candidates.iter().any(|c| &c.place_id == place_id));
            }
            tokio::task::yield_now().await;
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let (candidates, tally) = service.snapshot(&meeting()).await.unwrap();
        assert!(candidates.is_empty());
        assert!(tally.is_empty());
        assert!(ctx.locks().is_empty());

        let err = service.snapshot(&MeetingId::new("ghost")).await.unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_MEETING");
    }

    #[tokio::test]
    async fn test_remove_candidate_cascades_votes() {
        let (ctx, publisher) = context_with_meeting().await;
        let service = ConsensusService::new(&ctx);
        service.add_candidate(&meeting(), place("A"), actor("u1")).await.unwrap();
        service.add_candidate(&meeting(), place("B"), actor("u1")).await.unwrap();
        service.cast_vote(&meeting(), &PlaceId::new("A"), actor("u2")).await.unwrap();
        service.cast_vote(&meeting(), &PlaceId::new("A"), actor("u3")).await.unwrap();
        service.cast_vote(&meeting(), &PlaceId::new("B"), actor("u4")).await.unwrap();

        let removed = service
            .remove_candidate(&meeting(), &PlaceId::new("A"), &UserId::new("u1"))
            .await
            .unwrap();
        assert_eq!(removed.removed_votes, 2);
        assert_eq!(removed.candidates.len(), 1);
        assert_eq!(removed.tally.total(), 1);
        assert_eq!(publisher.types().last(), Some(&"candidate-removed"));

        let tally = service.get_tally(&meeting()).await.unwrap();
        assert_eq!(tally.count(&PlaceId::new("A")), 0);
        assert!(ctx
            .vote_repo()
            .find_by_voter(&meeting(), &UserId::new("u2"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_remove_candidate_permissions() {
        let (ctx, _) = context_with_meeting().await;
        let service = ConsensusService::new(&ctx);
        service.add_candidate(&meeting(), place("A"), actor("u1")).await.unwrap();
        service.add_candidate(&meeting(), place("B"), actor("u1")).await.unwrap();

        let err = service
            .remove_candidate(&meeting(), &PlaceId::new("A"), &UserId::new("u2"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        // organizer may remove anyone's proposal
        service
            .remove_candidate(&meeting(), &PlaceId::new("B"), &UserId::new("org"))
            .await
            .unwrap();

        let err = service
            .remove_candidate(&meeting(), &PlaceId::new("B"), &UserId::new("org"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_CANDIDATE");
    }

    #[tokio::test]
    async fn test_toggle_reaction_round_trip() {
        let (ctx, publisher) = context_with_meeting().await;
        let service = ConsensusService::new(&ctx);
        let message = service
            .post_message(&meeting(), actor("u1"), "where to?".to_string())
            .await
            .unwrap();

        let added = service
            .toggle_reaction(&meeting(), message.id, "👍", &UserId::new("u2"))
            .await
            .unwrap();
        assert_eq!(added.change, ReactionChange::Added);
        assert_eq!(added.reactions.count("👍"), 1);

        let removed = service
            .toggle_reaction(&meeting(), message.id, " 👍 ", &UserId::new("u2"))
            .await
            .unwrap();
        assert_eq!(removed.change, ReactionChange::Removed);
        assert!(removed.reactions.is_empty());

        assert_eq!(
            publisher.types(),
            vec!["message-created", "reaction-updated", "reaction-updated"]
        );

        let stored = service.list_messages(&meeting(), None).await.unwrap();
        assert_eq!(stored[0].reactions, message.reactions);
    }

    #[tokio::test]
    async fn test_reaction_errors() {
        let (ctx, _) = context_with_meeting().await;
        let service = ConsensusService::new(&ctx);

        let err = service
            .toggle_reaction(&meeting(), MessageId::generate(), "👍", &UserId::new("u1"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_MESSAGE");

        let err = service
            .toggle_reaction(&meeting(), MessageId::generate(), "  ", &UserId::new("u1"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let (ctx, publisher) = context_with_meeting().await;
        let err = ConsensusService::new(&ctx)
            .post_message(&meeting(), actor("u1"), "   ".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(publisher.events().is_empty());
    }
}
