//! Data transfer objects for gateway commands and REST endpoints
//!
//! This module provides:
//! - Request DTOs with validation for client inputs
//! - Response DTOs for acknowledgments and REST outputs

pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    AddCandidateRequest, CastVoteRequest, GameMeetingRequest, MessageHistoryQuery,
    ParticipantInput, PostMessageRequest, RecommendationRequest, RecordSelectionRequest,
    RegisterMeetingRequest, RemoveCandidateRequest, StartGameRequest, SubmitGameResultRequest,
    ToggleReactionRequest,
};

// Re-export commonly used response types
pub use responses::{
    ApiResponse, CandidateRemovedResponse, GameReply, GameReplyStatus, GameSnapshot,
    HealthResponse, ReactionResponse, RecommendationResponse, SelectionResponse, VoteResponse,
};
