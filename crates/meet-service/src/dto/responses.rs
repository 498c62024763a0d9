//! Response DTOs for gateway acknowledgments and REST endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use serde::Serialize;

use meet_core::{
    CandidatePlace, GameSession, MessageId, PlaceId, ReactionChange, ReactionSet, SelectionCount,
    SelectionEvent, VoteAction, VoteTally,
};

use crate::recommend::{ScoredVenue, SearchProfile};

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub connections: usize,
    pub rooms: usize,
    pub games: usize,
}

// ============================================================================
// Consensus Responses
// ============================================================================

/// Result of a vote command
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub action: VoteAction,
    pub place_id: PlaceId,
    pub tally: VoteTally,
}

/// Result of a candidate removal
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRemovedResponse {
    pub place_id: PlaceId,
    pub removed_votes: u64,
    pub candidates: Vec<CandidatePlace>,
    pub tally: VoteTally,
}

/// Result of a reaction toggle
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionResponse {
    pub message_id: MessageId,
    pub emoji: String,
    pub change: ReactionChange,
    pub reactions: ReactionSet,
}

/// A recorded selection with the updated counts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub selection: SelectionEvent,
    pub counts: Vec<SelectionCount>,
}

// ============================================================================
// Recommendation Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub profile: SearchProfile,
    pub venues: Vec<ScoredVenue>,
}

// ============================================================================
// Game Responses
// ============================================================================

/// A session as seen by a client, stamped with the server clock
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    #[serde(flatten)]
    pub session: GameSession,
    pub server_time: DateTime<Utc>,
}

impl From<GameSession> for GameSnapshot {
    fn from(session: GameSession) -> Self {
        Self {
            session,
            server_time: Utc::now(),
        }
    }
}

/// What a game command did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameReplyStatus {
    Started,
    Joined,
    Updated,
    Recorded,
    AlreadySubmitted,
    NotJoined,
    NotRunning,
    Reset,
}

/// Acknowledgment payload of a game command
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameReply {
    pub status: GameReplyStatus,
    pub game: Option<GameSnapshot>,
}

impl GameReply {
    pub fn new(status: GameReplyStatus, session: Option<&GameSession>) -> Self {
        Self {
            status,
            game: session.cloned().map(GameSnapshot::from),
        }
    }
}
