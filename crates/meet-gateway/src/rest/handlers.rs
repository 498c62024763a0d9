//! REST handlers
//!
//! Read-only views of a meeting's consensus state, meeting registration and
//! the recommendation endpoint. Mutations go through the socket.

use axum::{
    extract::{Path, State},
    Json,
};
use meet_common::AppError;
use meet_core::{
    CandidatePlace, ChatMessage, Meeting, MeetingId, Participant, SelectionCount, UserId,
    VoteTally,
};
use meet_service::dto::{
    ApiResponse, GameSnapshot, HealthResponse, MessageHistoryQuery, RecommendationRequest,
    RecommendationResponse, RegisterMeetingRequest,
};
use meet_service::{ConsensusService, RecommendationService, SelectionService};

use super::extractors::{ValidatedJson, ValidatedQuery};
use super::response::{ApiError, ApiResult};
use crate::server::GatewayState;

fn meeting_id(raw: &str) -> ApiResult<MeetingId> {
    let id = MeetingId::new(raw.trim());
    if id.is_blank() {
        return Err(ApiError::App(AppError::InvalidInput(
            "meeting id must not be empty".to_string(),
        )));
    }
    Ok(id)
}

/// Liveness plus live counters
///
/// GET /health
pub async fn health_check(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        connections: state.connections().connection_count(),
        rooms: state.rooms().room_count(),
        games: state.service_context().games().session_count(),
    })
}

/// Register a meeting and its organizer
///
/// PUT /meetings/{meeting_id}
pub async fn register_meeting(
    State(state): State<GatewayState>,
    Path(raw_id): Path<String>,
    ValidatedJson(request): ValidatedJson<RegisterMeetingRequest>,
) -> ApiResult<Json<ApiResponse<Meeting>>> {
    let meeting = ConsensusService::new(state.service_context())
        .register_meeting(meeting_id(&raw_id)?, UserId::new(request.organizer_id.trim()))
        .await?;
    Ok(Json(ApiResponse::new(meeting)))
}

/// GET /meetings/{meeting_id}/candidates
pub async fn get_candidates(
    State(state): State<GatewayState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<CandidatePlace>>>> {
    let candidates = ConsensusService::new(state.service_context())
        .list_candidates(&meeting_id(&raw_id)?)
        .await?;
    Ok(Json(ApiResponse::new(candidates)))
}

/// GET /meetings/{meeting_id}/tally
pub async fn get_tally(
    State(state): State<GatewayState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<ApiResponse<VoteTally>>> {
    let tally = ConsensusService::new(state.service_context())
        .get_tally(&meeting_id(&raw_id)?)
        .await?;
    Ok(Json(ApiResponse::new(tally)))
}

/// GET /meetings/{meeting_id}/messages?limit=
pub async fn get_messages(
    State(state): State<GatewayState>,
    Path(raw_id): Path<String>,
    ValidatedQuery(query): ValidatedQuery<MessageHistoryQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ChatMessage>>>> {
    let messages = ConsensusService::new(state.service_context())
        .list_messages(&meeting_id(&raw_id)?, query.limit)
        .await?;
    Ok(Json(ApiResponse::new(messages)))
}

/// GET /meetings/{meeting_id}/selections
pub async fn get_selections(
    State(state): State<GatewayState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<SelectionCount>>>> {
    let counts = SelectionService::new(state.service_context())
        .selection_stats(&meeting_id(&raw_id)?)
        .await?;
    Ok(Json(ApiResponse::new(counts)))
}

/// Current game, or null when none is running
///
/// GET /meetings/{meeting_id}/game
pub async fn get_game(
    State(state): State<GatewayState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Option<GameSnapshot>>>> {
    let game = state
        .service_context()
        .games()
        .status(&meeting_id(&raw_id)?)
        .await;
    Ok(Json(ApiResponse::new(game)))
}

/// Rank venues for a group
///
/// Scores the supplied venues when the body carries any, otherwise searches
/// the places provider around the group's centroid.
///
/// POST /meetings/{meeting_id}/recommendations
pub async fn recommend(
    State(state): State<GatewayState>,
    Path(raw_id): Path<String>,
    ValidatedJson(request): ValidatedJson<RecommendationRequest>,
) -> ApiResult<Json<ApiResponse<RecommendationResponse>>> {
    let meeting_id = meeting_id(&raw_id)?;
    let participants: Vec<Participant> =
        request.participants.into_iter().map(Participant::from).collect();
    let service = RecommendationService::new(state.service_context());

    let response = match request.venues {
        Some(venues) => service.score_venues(&meeting_id, participants, venues).await?,
        None => service.recommend(&meeting_id, participants).await?,
    };
    Ok(Json(ApiResponse::new(response)))
}
