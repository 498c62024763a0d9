//! Repository traits (ports) - define the interface for data access
//!
//! The persistence layer needs only create/read/update/delete-by-key,
//! per-field equality lookups and the one cascading delete below. Callers
//! serialize writes per meeting, so no multi-call transactions are assumed.

use async_trait::async_trait;

use crate::entities::{CandidatePlace, ChatMessage, Meeting, ReactionSet, SelectionEvent, Vote};
use crate::error::DomainError;
use crate::value_objects::{MeetingId, MessageId, PlaceId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Meeting Repository
// ============================================================================

#[async_trait]
pub trait MeetingRepository: Send + Sync {
    /// Find meeting by ID
    async fn find_by_id(&self, id: &MeetingId) -> RepoResult<Option<Meeting>>;

    /// Register a meeting; fails with `MeetingAlreadyExists` on a duplicate id
    async fn create(&self, meeting: &Meeting) -> RepoResult<()>;
}

// ============================================================================
// Candidate Repository
// ============================================================================

#[async_trait]
pub trait CandidateRepository: Send + Sync {
    /// Find one candidate by its composite key
    async fn find(&self, meeting_id: &MeetingId, place_id: &PlaceId)
        -> RepoResult<Option<CandidatePlace>>;

    /// List candidates of a meeting, oldest first
    async fn find_by_meeting(&self, meeting_id: &MeetingId) -> RepoResult<Vec<CandidatePlace>>;

    /// Insert a candidate; fails with `DuplicateCandidate` if the key exists
    async fn create(&self, candidate: &CandidatePlace) -> RepoResult<()>;

    /// Delete a candidate and every vote referencing it in one atomic step
    ///
    /// Returns the number of votes removed, or `None` if the candidate was absent.
    async fn delete_with_votes(&self, meeting_id: &MeetingId, place_id: &PlaceId)
        -> RepoResult<Option<u64>>;
}

// ============================================================================
// Vote Repository
// ============================================================================

#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Find the voter's current vote in a meeting
    async fn find_by_voter(&self, meeting_id: &MeetingId, voter_id: &UserId)
        -> RepoResult<Option<Vote>>;

    /// List all votes of a meeting
    async fn find_by_meeting(&self, meeting_id: &MeetingId) -> RepoResult<Vec<Vote>>;

    /// Insert a vote
    async fn create(&self, vote: &Vote) -> RepoResult<()>;

    /// Re-point an existing vote in place (same row, new place)
    async fn update(&self, vote: &Vote) -> RepoResult<()>;

    /// Delete the voter's vote
    async fn delete(&self, meeting_id: &MeetingId, voter_id: &UserId) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find a message (with reactions) within a meeting
    async fn find_by_id(&self, meeting_id: &MeetingId, id: MessageId)
        -> RepoResult<Option<ChatMessage>>;

    /// List the most recent messages of a meeting, oldest first
    async fn find_by_meeting(&self, meeting_id: &MeetingId, limit: usize)
        -> RepoResult<Vec<ChatMessage>>;

    /// Insert a message
    async fn create(&self, message: &ChatMessage) -> RepoResult<()>;

    /// Replace the reaction set of a message
    async fn update_reactions(&self, id: MessageId, reactions: &ReactionSet) -> RepoResult<()>;
}

// ============================================================================
// Selection Repository
// ============================================================================

#[async_trait]
pub trait SelectionRepository: Send + Sync {
    /// Append a selection event
    async fn append(&self, event: &SelectionEvent) -> RepoResult<()>;

    /// List all selection events of a meeting, oldest first
    async fn find_by_meeting(&self, meeting_id: &MeetingId) -> RepoResult<Vec<SelectionEvent>>;
}
