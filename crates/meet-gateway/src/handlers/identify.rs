//! Identify handler (op 2)

use super::{send_ack, HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::{AckPayload, CloseCode, IdentifyPayload};
use crate::server::GatewayState;
use meet_core::Actor;
use std::sync::Arc;
use validator::Validate;

/// Handles Identify messages
pub struct IdentifyHandler;

impl IdentifyHandler {
    /// Attach the declared identity to the connection
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: IdentifyPayload,
    ) -> HandlerResult<Option<CloseCode>> {
        if connection.is_identified() {
            tracing::warn!(
                connection_id = %connection.id(),
                "Client sent Identify while already identified"
            );
            return Ok(Some(CloseCode::AlreadyIdentified));
        }

        payload
            .validate()
            .map_err(|e| HandlerError::InvalidIdentity(e.to_string()))?;
        if payload.user_id.trim().is_empty() {
            return Err(HandlerError::InvalidIdentity("user id is blank".to_string()));
        }

        let actor = Actor::new(payload.user_id.trim(), payload.name());
        if !state
            .connections()
            .identify_connection(connection.id(), actor.clone())
        {
            return Ok(Some(CloseCode::AlreadyIdentified));
        }

        tracing::info!(
            connection_id = %connection.id(),
            user_id = %actor.id,
            "Connection identified"
        );

        send_ack(
            connection,
            AckPayload::success(
                None,
                serde_json::json!({
                    "sessionId": connection.session_id(),
                    "user": actor,
                }),
            ),
        )
        .await?;

        Ok(None)
    }
}
