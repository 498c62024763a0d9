//! DashMap-backed store implementing every repository trait
//!
//! All rows of a meeting live in one map entry, so a cascading delete
//! touches a single shard lock and is atomic with respect to readers.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::instrument;

use meet_core::entities::{CandidatePlace, ChatMessage, Meeting, ReactionSet, SelectionEvent, Vote};
use meet_core::error::DomainError;
use meet_core::traits::{
    CandidateRepository, MeetingRepository, MessageRepository, RepoResult, SelectionRepository,
    VoteRepository,
};
use meet_core::value_objects::{MeetingId, MessageId, PlaceId, UserId};

/// Rows belonging to one meeting
#[derive(Debug, Default)]
struct MeetingRows {
    candidates: Vec<CandidatePlace>,
    votes: Vec<Vote>,
    messages: Vec<ChatMessage>,
    selections: Vec<SelectionEvent>,
}

/// In-memory persistence for all meeting data
#[derive(Debug, Default)]
pub struct MemoryStore {
    meetings: DashMap<MeetingId, Meeting>,
    rows: DashMap<MeetingId, MeetingRows>,
    message_index: DashMap<MessageId, MeetingId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, meeting_id: &MeetingId, f: impl FnOnce(&MeetingRows) -> T) -> Option<T> {
        self.rows.get(meeting_id).map(|rows| f(&rows))
    }

    fn ensure_meeting(&self, meeting_id: &MeetingId) -> RepoResult<()> {
        if self.meetings.contains_key(meeting_id) {
            Ok(())
        } else {
            Err(DomainError::MeetingNotFound(meeting_id.clone()))
        }
    }
}

// ============================================================================
// Meetings
// ============================================================================

#[async_trait]
impl MeetingRepository for MemoryStore {
    async fn find_by_id(&self, id: &MeetingId) -> RepoResult<Option<Meeting>> {
        Ok(self.meetings.get(id).map(|m| m.clone()))
    }

    #[instrument(skip(self, meeting), fields(meeting_id = %meeting.id))]
    async fn create(&self, meeting: &Meeting) -> RepoResult<()> {
        match self.meetings.entry(meeting.id.clone()) {
            Entry::Occupied(_) => Err(DomainError::MeetingAlreadyExists(meeting.id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(meeting.clone());
                Ok(())
            }
        }
    }
}

// ============================================================================
// Candidates
// ============================================================================

#[async_trait]
impl CandidateRepository for MemoryStore {
    async fn find(
        &self,
        meeting_id: &MeetingId,
        place_id: &PlaceId,
    ) -> RepoResult<Option<CandidatePlace>> {
        Ok(self
            .read(meeting_id, |rows| {
                rows.candidates.iter().find(|c| &c.place_id == place_id).cloned()
            })
            .flatten())
    }

    async fn find_by_meeting(&self, meeting_id: &MeetingId) -> RepoResult<Vec<CandidatePlace>> {
        Ok(self
            .read(meeting_id, |rows| rows.candidates.clone())
            .unwrap_or_default())
    }

    #[instrument(skip(self, candidate), fields(meeting_id = %candidate.meeting_id, place_id = %candidate.place_id))]
    async fn create(&self, candidate: &CandidatePlace) -> RepoResult<()> {
        self.ensure_meeting(&candidate.meeting_id)?;

        let mut rows = self.rows.entry(candidate.meeting_id.clone()).or_default();
        if rows.candidates.iter().any(|c| c.place_id == candidate.place_id) {
            return Err(DomainError::DuplicateCandidate(candidate.place_id.clone()));
        }
        rows.candidates.push(candidate.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_with_votes(
        &self,
        meeting_id: &MeetingId,
        place_id: &PlaceId,
    ) -> RepoResult<Option<u64>> {
        let Some(mut rows) = self.rows.get_mut(meeting_id) else {
            return Ok(None);
        };

        let before = rows.candidates.len();
        rows.candidates.retain(|c| &c.place_id != place_id);
        if rows.candidates.len() == before {
            return Ok(None);
        }

        let votes_before = rows.votes.len();
        rows.votes.retain(|v| &v.place_id != place_id);
        Ok(Some((votes_before - rows.votes.len()) as u64))
    }
}

// ============================================================================
// Votes
// ============================================================================

#[async_trait]
impl VoteRepository for MemoryStore {
    async fn find_by_voter(
        &self,
        meeting_id: &MeetingId,
        voter_id: &UserId,
    ) -> RepoResult<Option<Vote>> {
        Ok(self
            .read(meeting_id, |rows| {
                rows.votes.iter().find(|v| &v.voter_id == voter_id).cloned()
            })
            .flatten())
    }

    async fn find_by_meeting(&self, meeting_id: &MeetingId) -> RepoResult<Vec<Vote>> {
        Ok(self.read(meeting_id, |rows| rows.votes.clone()).unwrap_or_default())
    }

    #[instrument(skip(self, vote), fields(meeting_id = %vote.meeting_id, voter_id = %vote.voter_id))]
    async fn create(&self, vote: &Vote) -> RepoResult<()> {
        let mut rows = self
            .rows
            .get_mut(&vote.meeting_id)
            .ok_or_else(|| DomainError::CandidateNotFound(vote.place_id.clone()))?;

        if !rows.candidates.iter().any(|c| c.place_id == vote.place_id) {
            return Err(DomainError::CandidateNotFound(vote.place_id.clone()));
        }
        if rows.votes.iter().any(|v| v.voter_id == vote.voter_id) {
            return Err(DomainError::ValidationError(format!(
                "voter {} already has a vote",
                vote.voter_id
            )));
        }
        rows.votes.push(vote.clone());
        Ok(())
    }

    #[instrument(skip(self, vote), fields(meeting_id = %vote.meeting_id, voter_id = %vote.voter_id))]
    async fn update(&self, vote: &Vote) -> RepoResult<()> {
        let not_found = || DomainError::VoteNotFound(vote.voter_id.clone());
        let mut rows = self.rows.get_mut(&vote.meeting_id).ok_or_else(not_found)?;

        if !rows.candidates.iter().any(|c| c.place_id == vote.place_id) {
            return Err(DomainError::CandidateNotFound(vote.place_id.clone()));
        }
        let existing = rows
            .votes
            .iter_mut()
            .find(|v| v.voter_id == vote.voter_id)
            .ok_or_else(not_found)?;
        *existing = vote.clone();
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, meeting_id: &MeetingId, voter_id: &UserId) -> RepoResult<()> {
        if let Some(mut rows) = self.rows.get_mut(meeting_id) {
            rows.votes.retain(|v| &v.voter_id != voter_id);
        }
        Ok(())
    }
}

// ============================================================================
// Messages
// ============================================================================

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn find_by_id(
        &self,
        meeting_id: &MeetingId,
        id: MessageId,
    ) -> RepoResult<Option<ChatMessage>> {
        Ok(self
            .read(meeting_id, |rows| rows.messages.iter().find(|m| m.id == id).cloned())
            .flatten())
    }

    async fn find_by_meeting(
        &self,
        meeting_id: &MeetingId,
        limit: usize,
    ) -> RepoResult<Vec<ChatMessage>> {
        Ok(self
            .read(meeting_id, |rows| {
                let skip = rows.messages.len().saturating_sub(limit);
                rows.messages[skip..].to_vec()
            })
            .unwrap_or_default())
    }

    #[instrument(skip(self, message), fields(meeting_id = %message.meeting_id, message_id = %message.id))]
    async fn create(&self, message: &ChatMessage) -> RepoResult<()> {
        self.ensure_meeting(&message.meeting_id)?;

        self.rows
            .entry(message.meeting_id.clone())
            .or_default()
            .messages
            .push(message.clone());
        self.message_index.insert(message.id, message.meeting_id.clone());
        Ok(())
    }

    #[instrument(skip(self, reactions))]
    async fn update_reactions(&self, id: MessageId, reactions: &ReactionSet) -> RepoResult<()> {
        let meeting_id = self
            .message_index
            .get(&id)
            .map(|m| m.clone())
            .ok_or(DomainError::MessageNotFound(id))?;

        let mut rows = self
            .rows
            .get_mut(&meeting_id)
            .ok_or(DomainError::MessageNotFound(id))?;
        let message = rows
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(DomainError::MessageNotFound(id))?;
        message.reactions = reactions.clone();
        Ok(())
    }
}

// ============================================================================
// Selections
// ============================================================================

#[async_trait]
impl SelectionRepository for MemoryStore {
    #[instrument(skip(self, event), fields(meeting_id = %event.meeting_id))]
    async fn append(&self, event: &SelectionEvent) -> RepoResult<()> {
        self.ensure_meeting(&event.meeting_id)?;

        self.rows
            .entry(event.meeting_id.clone())
            .or_default()
            .selections
            .push(event.clone());
        Ok(())
    }

    async fn find_by_meeting(&self, meeting_id: &MeetingId) -> RepoResult<Vec<SelectionEvent>> {
        Ok(self
            .read(meeting_id, |rows| rows.selections.clone())
            .unwrap_or_default())
    }
}
