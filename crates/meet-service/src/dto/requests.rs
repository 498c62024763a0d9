//! Request DTOs for gateway commands and REST endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use validator::Validate;

use meet_core::{
    Coordinates, GameKind, MessageId, Participant, ParticipantPreferences, PlaceDetails, PlaceId,
    TravelMode, UserId, Venue,
};

// ============================================================================
// Meeting Requests
// ============================================================================

/// Register a meeting and its organizer
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMeetingRequest {
    #[validate(length(min = 1, max = 64, message = "Organizer id must be 1-64 characters"))]
    pub organizer_id: String,
}

// ============================================================================
// Candidate Requests
// ============================================================================

/// Propose a place for a meeting
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCandidateRequest {
    #[validate(length(min = 1, max = 64, message = "Meeting id must be 1-64 characters"))]
    pub meeting_id: String,

    #[validate(length(min = 1, max = 128, message = "Place id must be 1-128 characters"))]
    pub place_id: String,

    #[validate(length(min = 1, max = 100, message = "Place name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 50, message = "Category must be at most 50 characters"))]
    pub category: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude out of range"))]
    pub lng: f64,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,
}

impl AddCandidateRequest {
    pub fn place(&self) -> PlaceDetails {
        PlaceDetails {
            place_id: PlaceId::new(self.place_id.trim()),
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            coordinates: Coordinates {
                lat: self.lat,
                lng: self.lng,
            },
            rating: self.rating,
        }
    }
}

/// Remove a proposed place
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCandidateRequest {
    #[validate(length(min = 1, max = 64, message = "Meeting id must be 1-64 characters"))]
    pub meeting_id: String,

    #[validate(length(min = 1, max = 128, message = "Place id must be 1-128 characters"))]
    pub place_id: String,
}

/// Vote for a place; voting for the current choice again retracts it
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    #[validate(length(min = 1, max = 64, message = "Meeting id must be 1-64 characters"))]
    pub meeting_id: String,

    #[validate(length(min = 1, max = 128, message = "Place id must be 1-128 characters"))]
    pub place_id: String,
}

// ============================================================================
// Message Requests
// ============================================================================

/// Post a chat message
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    #[validate(length(min = 1, max = 64, message = "Meeting id must be 1-64 characters"))]
    pub meeting_id: String,

    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub content: String,
}

/// Toggle an emoji reaction on a message
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReactionRequest {
    #[validate(length(min = 1, max = 64, message = "Meeting id must be 1-64 characters"))]
    pub meeting_id: String,

    pub message_id: MessageId,

    #[validate(length(min = 1, max = 32, message = "Emoji must be 1-32 characters"))]
    pub emoji: String,
}

// ============================================================================
// Selection Requests
// ============================================================================

/// Record that a participant was chosen
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordSelectionRequest {
    #[validate(length(min = 1, max = 64, message = "Meeting id must be 1-64 characters"))]
    pub meeting_id: String,

    #[validate(length(min = 1, max = 64, message = "Participant id must be 1-64 characters"))]
    pub participant_id: String,

    #[validate(length(min = 1, max = 100, message = "Participant name must be 1-100 characters"))]
    pub participant_name: String,
}

// ============================================================================
// Game Requests
// ============================================================================

/// Start (or restart) the meeting's mini-game
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    #[validate(length(min = 1, max = 64, message = "Meeting id must be 1-64 characters"))]
    pub meeting_id: String,

    #[validate(length(min = 1, max = 64, message = "Game id must be 1-64 characters"))]
    pub game_id: String,

    #[serde(default)]
    pub kind: GameKind,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 3600.0, message = "Target must be 0-3600 seconds"))]
    pub target_value: f64,
}

/// Game commands that only name the meeting (join, reset)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GameMeetingRequest {
    #[validate(length(min = 1, max = 64, message = "Meeting id must be 1-64 characters"))]
    pub meeting_id: String,
}

/// Submit a game result
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitGameResultRequest {
    #[validate(length(min = 1, max = 64, message = "Meeting id must be 1-64 characters"))]
    pub meeting_id: String,

    pub value: f64,
}

// ============================================================================
// Recommendation Requests
// ============================================================================

/// Rank venues for a group
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[validate(length(min = 1, max = 50, message = "1-50 participants are required"), nested)]
    pub participants: Vec<ParticipantInput>,

    /// Score these venues instead of searching the places provider
    #[serde(default)]
    pub venues: Option<Vec<Venue>>,
}

/// One participant of a recommendation request
///
/// `Serialize` is needed because the list length check records the
/// rejected value in its error params.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInput {
    #[validate(length(min = 1, max = 64, message = "Participant id must be 1-64 characters"))]
    pub id: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude out of range"))]
    pub lng: f64,

    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 categories"))]
    pub categories: Vec<String>,

    #[serde(default)]
    pub transport: Option<TravelMode>,

    #[serde(default)]
    #[validate(range(min = 0.1, max = 500.0, message = "Max distance must be 0.1-500 km"))]
    pub max_distance_km: Option<f64>,
}

impl From<ParticipantInput> for Participant {
    fn from(input: ParticipantInput) -> Self {
        Self {
            id: UserId::new(input.id),
            name: input.name,
            location: Coordinates {
                lat: input.lat,
                lng: input.lng,
            },
            preferences: ParticipantPreferences {
                categories: input.categories,
                transport: input.transport,
                max_distance_km: input.max_distance_km,
            },
        }
    }
}

/// Recent chat history query
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MessageHistoryQuery {
    #[validate(range(min = 1, max = 100, message = "Limit must be 1-100"))]
    pub limit: Option<usize>,
}
