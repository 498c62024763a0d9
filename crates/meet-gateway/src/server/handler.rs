//! WebSocket handler
//!
//! Handles WebSocket connections and message processing.

use crate::connection::{Connection, ConnectionState};
use crate::handlers::MessageDispatcher;
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::time::interval;

/// Heartbeat interval announced in Hello, in milliseconds
const HEARTBEAT_INTERVAL_MS: u64 = HelloPayload::DEFAULT_HEARTBEAT_INTERVAL;

/// Timeout for no heartbeat before considering connection dead
const HEARTBEAT_TIMEOUT_MS: u64 = HEARTBEAT_INTERVAL_MS * 2;

type WsSink = Arc<Mutex<SplitSink<WebSocket, Message>>>;

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    // Outbound queue shared by acks and room broadcasts
    let (tx, mut rx) = mpsc::channel::<GatewayMessage>(state.config().room.buffer_size);

    let connection = state.connections().add_connection(tx);
    let connection_id = connection.id();

    tracing::info!(
        connection_id = %connection_id,
        session_id = %connection.session_id(),
        "WebSocket connection established"
    );

    let (ws_sink, mut ws_stream) = socket.split();
    let ws_sink: WsSink = Arc::new(Mutex::new(ws_sink));

    // Send Hello message immediately
    let hello = GatewayMessage::hello(HelloPayload::with_interval(HEARTBEAT_INTERVAL_MS));
    if let Ok(json) = hello.to_json() {
        if ws_sink.lock().await.send(Message::Text(json)).await.is_err() {
            tracing::warn!(connection_id = %connection_id, "Failed to send Hello message");
            cleanup_connection(&state, &connection).await;
            return;
        }
    }

    let state_recv = state.clone();
    let connection_recv = connection.clone();

    // Spawn task to receive messages from WebSocket
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Err(close_code) =
                        handle_text_message(&state_recv, &connection_recv, &text).await
                    {
                        return Some(close_code);
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        connection_id = %connection_recv.id(),
                        "Binary messages not supported"
                    );
                    return Some(CloseCode::DecodeError);
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Pong is handled automatically by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(connection_id = %connection_recv.id(), "Client closed connection");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection_recv.id(),
                        error = %e,
                        "WebSocket error"
                    );
                    return None;
                }
            }
        }
        None
    });

    let sink_send = ws_sink.clone();

    // Spawn task to drain the outbound queue into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match msg.to_json() {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize outbound message");
                    continue;
                }
            };
            if sink_send.lock().await.send(Message::Text(json)).await.is_err() {
                tracing::warn!(
                    connection_id = %connection_id,
                    "Failed to send message to WebSocket"
                );
                break;
            }
        }
    });

    let connection_hb = connection.clone();

    // Spawn heartbeat monitoring task
    let mut heartbeat_task = tokio::spawn(async move {
        let mut check_interval = interval(Duration::from_millis(HEARTBEAT_INTERVAL_MS / 2));

        loop {
            check_interval.tick().await;

            let time_since = connection_hb.time_since_heartbeat();
            if time_since > Duration::from_millis(HEARTBEAT_TIMEOUT_MS) {
                tracing::warn!(
                    connection_id = %connection_hb.id(),
                    time_since_ms = time_since.as_millis(),
                    "Connection timed out (no heartbeat)"
                );
                return CloseCode::HeartbeatTimeout;
            }
        }
    });

    // Wait for any task to complete
    let close_code = tokio::select! {
        result = &mut recv_task => result.ok().flatten(),
        _ = &mut send_task => {
            tracing::debug!(connection_id = %connection_id, "Send task ended");
            None
        }
        result = &mut heartbeat_task => result.ok(),
    };

    recv_task.abort();
    send_task.abort();
    heartbeat_task.abort();

    close_socket(&ws_sink, close_code).await;
    cleanup_connection(&state, &connection).await;
}

/// Handle a text message from the client
async fn handle_text_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    text: &str,
) -> Result<(), CloseCode> {
    let message = match GatewayMessage::parse(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(
                connection_id = %connection.id(),
                error = %e,
                "Failed to parse message"
            );
            return Err(e.close_code());
        }
    };

    tracing::trace!(
        connection_id = %connection.id(),
        op = %message.op,
        "Received message"
    );

    match MessageDispatcher::dispatch(state, connection, message).await {
        Ok(Some(close_code)) => Err(close_code),
        Ok(None) => Ok(()),
        Err(e) => {
            tracing::warn!(
                connection_id = %connection.id(),
                error = %e,
                "Handler error"
            );
            Err(e.to_close_code())
        }
    }
}

/// Send a close frame, carrying the gateway close code when there is one
async fn close_socket(ws_sink: &WsSink, close_code: Option<CloseCode>) {
    let frame = close_code.map(|code| CloseFrame {
        code: code.as_u16(),
        reason: Cow::Borrowed(code.reason()),
    });

    if let Some(code) = close_code {
        tracing::debug!(close_code = %code, "Closing connection");
    }

    let mut sink = ws_sink.lock().await;
    if sink.send(Message::Close(frame)).await.is_err() {
        tracing::trace!("Socket already closed");
    }
    let _ = sink.close().await;
}

/// Release everything a connection held
///
/// Leaves every room first so no further events are queued, then lets the
/// game manager drop the connection's players.
async fn cleanup_connection(state: &GatewayState, connection: &Arc<Connection>) {
    tracing::info!(connection_id = %connection.id(), "Cleaning up connection");

    connection.set_state(ConnectionState::Disconnected);

    let rooms = state.rooms().leave_all(connection.id());
    if !rooms.is_empty() {
        tracing::debug!(
            connection_id = %connection.id(),
            rooms = rooms.len(),
            "Left rooms on disconnect"
        );
    }

    state
        .service_context()
        .games()
        .handle_disconnect(connection.id())
        .await;

    state.connections().remove_connection(connection.id());
}
