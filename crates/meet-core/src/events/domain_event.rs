//! Domain events - room-scoped state changes pushed to connected clients
//!
//! Every committed mutation produces exactly one of these. The gateway wraps
//! the serialized payload in a dispatch frame whose `t` is [`DomainEvent::event_type`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::{
    Actor, CandidatePlace, ChatMessage, FinishReason, GameKind, GameSession, Player, RankedResult,
    ReactionChange, ReactionSet, SelectionCount, SelectionEvent, VoteAction, VoteTally,
};
use crate::value_objects::{GameId, MeetingId, MessageId, PlaceId, UserId};

/// All events broadcast to a meeting room
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DomainEvent {
    // =========================================================================
    // Consensus Events
    // =========================================================================
    CandidateAdded(CandidateAddedEvent),
    CandidateRemoved(CandidateRemovedEvent),
    VoteUpdated(VoteUpdatedEvent),
    MessageCreated(MessageCreatedEvent),
    ReactionUpdated(ReactionUpdatedEvent),
    SelectionRecorded(SelectionRecordedEvent),

    // =========================================================================
    // Game Events
    // =========================================================================
    GameStarted(GameStartedEvent),
    GamePlayersUpdated(GamePlayersUpdatedEvent),
    GamePlayerResult(GamePlayerResultEvent),
    GameFinished(GameFinishedEvent),
    GameCancelled(GameCancelledEvent),
    GameReset(GameResetEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CandidateAdded(_) => "candidate-added",
            Self::CandidateRemoved(_) => "candidate-removed",
            Self::VoteUpdated(_) => "vote-updated",
            Self::MessageCreated(_) => "message-created",
            Self::ReactionUpdated(_) => "reaction-updated",
            Self::SelectionRecorded(_) => "selection-recorded",
            Self::GameStarted(_) => "game-started",
            Self::GamePlayersUpdated(_) => "game-players-updated",
            Self::GamePlayerResult(_) => "game-player-result",
            Self::GameFinished(_) => "game-finished",
            Self::GameCancelled(_) => "game-cancelled",
            Self::GameReset(_) => "game-reset",
        }
    }

    /// Get the meeting (room) this event belongs to
    pub fn meeting_id(&self) -> &MeetingId {
        match self {
            Self::CandidateAdded(e) => &e.meeting_id,
            Self::CandidateRemoved(e) => &e.meeting_id,
            Self::VoteUpdated(e) => &e.meeting_id,
            Self::MessageCreated(e) => &e.message.meeting_id,
            Self::ReactionUpdated(e) => &e.meeting_id,
            Self::SelectionRecorded(e) => &e.selection.meeting_id,
            Self::GameStarted(e) => &e.session.meeting_id,
            Self::GamePlayersUpdated(e) => &e.meeting_id,
            Self::GamePlayerResult(e) => &e.meeting_id,
            Self::GameFinished(e) => &e.meeting_id,
            Self::GameCancelled(e) => &e.meeting_id,
            Self::GameReset(e) => &e.meeting_id,
        }
    }

    /// Serialize the payload without the variant wrapper
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAddedEvent {
    pub meeting_id: MeetingId,
    pub candidate: CandidatePlace,
    pub candidates: Vec<CandidatePlace>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRemovedEvent {
    pub meeting_id: MeetingId,
    pub place_id: PlaceId,
    pub removed_by: UserId,
    pub removed_votes: u64,
    pub candidates: Vec<CandidatePlace>,
    pub tally: VoteTally,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteUpdatedEvent {
    pub meeting_id: MeetingId,
    pub place_id: PlaceId,
    pub voter_id: UserId,
    pub action: VoteAction,
    pub tally: VoteTally,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCreatedEvent {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionUpdatedEvent {
    pub meeting_id: MeetingId,
    pub message_id: MessageId,
    pub emoji: String,
    pub user_id: UserId,
    pub change: ReactionChange,
    pub reactions: ReactionSet,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRecordedEvent {
    pub selection: SelectionEvent,
    pub counts: Vec<SelectionCount>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStartedEvent {
    pub session: GameSession,
    /// Absolute auto-end instant clients count down to
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePlayersUpdatedEvent {
    pub meeting_id: MeetingId,
    pub game_id: GameId,
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePlayerResultEvent {
    pub meeting_id: MeetingId,
    pub game_id: GameId,
    pub player_id: UserId,
    pub name: String,
    pub value: f64,
    pub submitted_count: usize,
    pub player_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameFinishedEvent {
    pub meeting_id: MeetingId,
    pub game_id: GameId,
    pub kind: GameKind,
    pub reason: FinishReason,
    pub target_value: f64,
    pub ranking: Vec<RankedResult>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCancelledEvent {
    pub meeting_id: MeetingId,
    pub game_id: GameId,
    pub reason: FinishReason,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResetEvent {
    pub meeting_id: MeetingId,
    pub game_id: Option<GameId>,
    pub reset_by: Actor,
}
