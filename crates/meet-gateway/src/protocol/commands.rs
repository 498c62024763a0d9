//! Client commands carried by op 5
//!
//! Each command maps onto one consensus, selection or game operation. The
//! `type` tag sits alongside the request fields:
//!
//! ```json
//! {"type": "cast-vote", "meetingId": "m1", "placeId": "p1"}
//! ```

use meet_service::dto::{
    AddCandidateRequest, CastVoteRequest, GameMeetingRequest, PostMessageRequest,
    RecordSelectionRequest, RemoveCandidateRequest, StartGameRequest, SubmitGameResultRequest,
    ToggleReactionRequest,
};
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

/// A mutating request against one meeting
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Command {
    AddCandidate(AddCandidateRequest),
    RemoveCandidate(RemoveCandidateRequest),
    CastVote(CastVoteRequest),
    PostMessage(PostMessageRequest),
    ToggleReaction(ToggleReactionRequest),
    RecordSelection(RecordSelectionRequest),
    StartGame(StartGameRequest),
    JoinGame(GameMeetingRequest),
    SubmitGameResult(SubmitGameResultRequest),
    ResetGame(GameMeetingRequest),
}

impl Command {
    /// Wire name of the command
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddCandidate(_) => "add-candidate",
            Self::RemoveCandidate(_) => "remove-candidate",
            Self::CastVote(_) => "cast-vote",
            Self::PostMessage(_) => "post-message",
            Self::ToggleReaction(_) => "toggle-reaction",
            Self::RecordSelection(_) => "record-selection",
            Self::StartGame(_) => "start-game",
            Self::JoinGame(_) => "join-game",
            Self::SubmitGameResult(_) => "submit-game-result",
            Self::ResetGame(_) => "reset-game",
        }
    }

    /// Meeting the command targets
    pub fn meeting_id(&self) -> &str {
        match self {
            Self::AddCandidate(r) => &r.meeting_id,
            Self::RemoveCandidate(r) => &r.meeting_id,
            Self::CastVote(r) => &r.meeting_id,
            Self::PostMessage(r) => &r.meeting_id,
            Self::ToggleReaction(r) => &r.meeting_id,
            Self::RecordSelection(r) => &r.meeting_id,
            Self::StartGame(r) => &r.meeting_id,
            Self::JoinGame(r) | Self::ResetGame(r) => &r.meeting_id,
            Self::SubmitGameResult(r) => &r.meeting_id,
        }
    }

    /// Run the request's field validation
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::AddCandidate(r) => r.validate(),
            Self::RemoveCandidate(r) => r.validate(),
            Self::CastVote(r) => r.validate(),
            Self::PostMessage(r) => r.validate(),
            Self::ToggleReaction(r) => r.validate(),
            Self::RecordSelection(r) => r.validate(),
            Self::StartGame(r) => r.validate(),
            Self::JoinGame(r) | Self::ResetGame(r) => r.validate(),
            Self::SubmitGameResult(r) => r.validate(),
        }
    }
}
