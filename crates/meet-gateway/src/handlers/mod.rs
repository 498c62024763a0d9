//! Op code handlers
//!
//! Handles incoming WebSocket frames based on their operation code.

mod command;
mod error;
mod heartbeat;
mod identify;
mod rooms;

pub use command::CommandHandler;
pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;
pub use identify::IdentifyHandler;
pub use rooms::RoomHandler;

use crate::connection::Connection;
use crate::protocol::{AckPayload, CloseCode, GatewayMessage, OpCode};
use crate::server::GatewayState;
use std::sync::Arc;

/// Dispatch incoming client frames to the appropriate handler
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle an incoming client frame
    ///
    /// `Ok(Some(code))` asks the caller to close the connection.
    pub async fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: GatewayMessage,
    ) -> HandlerResult<Option<CloseCode>> {
        if !message.op.is_client_op() {
            tracing::warn!(
                connection_id = %connection.id(),
                op = %message.op,
                "Received server-only op code from client"
            );
            return Ok(Some(CloseCode::UnknownOpcode));
        }

        if message.op.requires_identity() && !connection.is_identified() {
            return Err(HandlerError::NotIdentified);
        }

        match message.op {
            OpCode::Heartbeat => HeartbeatHandler::handle(connection).await,
            OpCode::Identify => {
                let payload = message.as_identify().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Identify payload".to_string())
                })?;

                IdentifyHandler::handle(state, connection, payload).await
            }
            OpCode::JoinRoom => {
                let payload = message.as_room().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid JoinRoom payload".to_string())
                })?;

                RoomHandler::join(state, connection, payload).await
            }
            OpCode::LeaveRoom => {
                let payload = message.as_room().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid LeaveRoom payload".to_string())
                })?;

                RoomHandler::leave(state, connection, payload).await
            }
            OpCode::Command => {
                let envelope = message.as_command().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Command payload".to_string())
                })?;

                CommandHandler::handle(state, connection, envelope).await
            }
            // These ops should never reach here due to is_client_op check
            _ => {
                tracing::error!(op = %message.op, "Unhandled client op code");
                Ok(Some(CloseCode::UnknownOpcode))
            }
        }
    }
}

/// Queue an acknowledgement on the connection's outbound channel
async fn send_ack(connection: &Connection, ack: AckPayload) -> HandlerResult<()> {
    connection
        .send(GatewayMessage::ack(ack))
        .await
        .map_err(|_| HandlerError::Internal("Failed to send ack".to_string()))
}
