//! Command handler (op 5)
//!
//! Runs one consensus, selection or game operation and acknowledges it.

use super::{send_ack, HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::{AckPayload, CloseCode, Command, CommandEnvelope};
use crate::server::GatewayState;
use meet_common::{AppError, ErrorResponse};
use meet_core::{Actor, ConnectionId, GameId, GameStart, MeetingId, PlaceId};
use meet_service::{ConsensusService, SelectionService};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Handles Command messages
pub struct CommandHandler;

impl CommandHandler {
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        envelope: CommandEnvelope,
    ) -> HandlerResult<Option<CloseCode>> {
        let actor = connection.actor().ok_or(HandlerError::NotIdentified)?;
        let name = envelope.command.name();
        let meeting_id = envelope.command.meeting_id().to_string();

        let ack = match execute(state, connection.id(), actor, envelope.command).await {
            Ok(data) => {
                tracing::debug!(
                    connection_id = %connection.id(),
                    command = name,
                    meeting_id = %meeting_id,
                    "Command applied"
                );
                AckPayload::success(envelope.nonce, data)
            }
            Err(err) => {
                if err.is_server_error() {
                    tracing::error!(
                        connection_id = %connection.id(),
                        command = name,
                        meeting_id = %meeting_id,
                        error = ?err,
                        "Command failed"
                    );
                } else {
                    tracing::debug!(
                        connection_id = %connection.id(),
                        command = name,
                        meeting_id = %meeting_id,
                        error = %err,
                        "Command rejected"
                    );
                }
                AckPayload::failure(envelope.nonce, ErrorResponse::from(&err))
            }
        };

        send_ack(connection, ack).await?;
        Ok(None)
    }
}

async fn execute(
    state: &GatewayState,
    origin: ConnectionId,
    actor: Actor,
    command: Command,
) -> Result<Value, AppError> {
    command.validate().map_err(AppError::validation)?;

    let ctx = state.service_context();
    let consensus = ConsensusService::new(ctx);

    match command {
        Command::AddCandidate(request) => {
            let meeting_id = MeetingId::new(request.meeting_id.trim());
            to_data(consensus.add_candidate(&meeting_id, request.place(), actor).await?)
        }
        Command::RemoveCandidate(request) => {
            let meeting_id = MeetingId::new(request.meeting_id.trim());
            let place_id = PlaceId::new(request.place_id.trim());
            to_data(
                consensus
                    .remove_candidate(&meeting_id, &place_id, &actor.id)
                    .await?,
            )
        }
        Command::CastVote(request) => {
            let meeting_id = MeetingId::new(request.meeting_id.trim());
            let place_id = PlaceId::new(request.place_id.trim());
            to_data(consensus.cast_vote(&meeting_id, &place_id, actor).await?)
        }
        Command::PostMessage(request) => {
            let meeting_id = MeetingId::new(request.meeting_id.trim());
            to_data(consensus.post_message(&meeting_id, actor, request.content).await?)
        }
        Command::ToggleReaction(request) => {
            let meeting_id = MeetingId::new(request.meeting_id.trim());
            to_data(
                consensus
                    .toggle_reaction(&meeting_id, request.message_id, &request.emoji, &actor.id)
                    .await?,
            )
        }
        Command::RecordSelection(request) => {
            let meeting_id = MeetingId::new(request.meeting_id.trim());
            let participant = Actor::new(
                request.participant_id.trim(),
                request.participant_name.trim(),
            );
            to_data(
                SelectionService::new(ctx)
                    .record_selection(&meeting_id, participant)
                    .await?,
            )
        }
        Command::StartGame(request) => {
            let params = GameStart {
                meeting_id: MeetingId::new(request.meeting_id.trim()),
                game_id: GameId::new(request.game_id.trim()),
                kind: request.kind,
                target_value: request.target_value,
                started_by: actor,
            };
            to_data(ctx.games().start(params, Some(origin)).await?)
        }
        Command::JoinGame(request) => {
            let meeting_id = MeetingId::new(request.meeting_id.trim());
            to_data(ctx.games().join(&meeting_id, actor, Some(origin)).await)
        }
        Command::SubmitGameResult(request) => {
            let meeting_id = MeetingId::new(request.meeting_id.trim());
            to_data(
                ctx.games()
                    .submit(&meeting_id, &actor.id, request.value, Some(origin))
                    .await?,
            )
        }
        Command::ResetGame(request) => {
            let meeting_id = MeetingId::new(request.meeting_id.trim());
            to_data(ctx.games().reset(&meeting_id, actor).await)
        }
    }
}

fn to_data<T: Serialize>(value: T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(AppError::internal)
}
