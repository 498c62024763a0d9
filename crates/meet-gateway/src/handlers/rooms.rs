//! Room membership handlers (op 3, op 4)

use super::{send_ack, HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::{AckPayload, CloseCode, RoomPayload};
use crate::server::GatewayState;
use meet_core::{CandidatePlace, MeetingId, VoteTally};
use meet_service::dto::GameSnapshot;
use meet_service::ConsensusService;
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

/// State handed to a connection that just joined a room
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoomJoined {
    meeting_id: MeetingId,
    members: usize,
    /// Absent when the meeting is not registered
    #[serde(skip_serializing_if = "Option::is_none")]
    candidates: Option<Vec<CandidatePlace>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tally: Option<VoteTally>,
    game: Option<GameSnapshot>,
}

/// Handles JoinRoom and LeaveRoom
pub struct RoomHandler;

impl RoomHandler {
    /// Subscribe the connection to a meeting's events
    pub async fn join(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: RoomPayload,
    ) -> HandlerResult<Option<CloseCode>> {
        payload
            .validate()
            .map_err(|e| HandlerError::InvalidPayload(e.to_string()))?;
        let meeting_id = MeetingId::new(payload.meeting_id.trim());

        state
            .rooms()
            .join(&meeting_id, connection.id(), connection.sender());

        let (candidates, tally) = ConsensusService::new(state.service_context())
            .snapshot(&meeting_id)
            .await
            .ok()
            .unzip();
        let joined = RoomJoined {
            members: state.rooms().room_size(&meeting_id),
            candidates,
            tally,
            game: state.service_context().games().status(&meeting_id).await,
            meeting_id,
        };

        tracing::debug!(
            connection_id = %connection.id(),
            meeting_id = %joined.meeting_id,
            members = joined.members,
            "Room joined"
        );

        let data = serde_json::to_value(&joined)
            .map_err(|e| HandlerError::Internal(e.to_string()))?;
        send_ack(connection, AckPayload::success(payload.nonce, data)).await?;
        Ok(None)
    }

    /// Stop receiving a meeting's events
    pub async fn leave(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: RoomPayload,
    ) -> HandlerResult<Option<CloseCode>> {
        payload
            .validate()
            .map_err(|e| HandlerError::InvalidPayload(e.to_string()))?;
        let meeting_id = MeetingId::new(payload.meeting_id.trim());

        let left = state.rooms().leave(&meeting_id, connection.id());

        send_ack(
            connection,
            AckPayload::success(
                payload.nonce,
                serde_json::json!({ "meetingId": meeting_id, "left": left }),
            ),
        )
        .await?;
        Ok(None)
    }
}
