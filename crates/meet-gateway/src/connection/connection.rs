//! Individual WebSocket connection
//!
//! Represents a single WebSocket connection and its state.

use crate::protocol::GatewayMessage;
use meet_core::{Actor, ConnectionId};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Connection established, waiting for Identify
    Connecting,
    /// Identity declared; rooms and commands are available
    Identified,
    /// Connection is closed
    Disconnected,
}

/// A single WebSocket connection
pub struct Connection {
    /// Process-unique id used for room membership and echo suppression
    id: ConnectionId,

    /// Opaque session token reported to the client
    session_id: String,

    /// Declared identity (None until Identify)
    actor: RwLock<Option<Actor>>,

    state: RwLock<ConnectionState>,

    /// Channel to the socket writer task
    sender: mpsc::Sender<GatewayMessage>,

    last_heartbeat: Mutex<Instant>,
}

impl Connection {
    /// Create a new connection
    pub fn new(
        id: ConnectionId,
        session_id: String,
        sender: mpsc::Sender<GatewayMessage>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            session_id,
            actor: RwLock::new(None),
            state: RwLock::new(ConnectionState::Connecting),
            sender,
            last_heartbeat: Mutex::new(Instant::now()),
        })
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The declared identity, if any
    pub fn actor(&self) -> Option<Actor> {
        self.actor.read().clone()
    }

    /// Record the identity; returns false if one was already set
    pub fn identify(&self, actor: Actor) -> bool {
        let mut slot = self.actor.write();
        if slot.is_some() {
            return false;
        }
        *slot = Some(actor);
        *self.state.write() = ConnectionState::Identified;
        true
    }

    pub fn is_identified(&self) -> bool {
        self.actor.read().is_some()
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    pub fn set_state(&self, state: ConnectionState) {
        *self.state.write() = state;
    }

    /// Record a heartbeat received
    pub fn record_heartbeat(&self) {
        *self.last_heartbeat.lock() = Instant::now();
    }

    /// Get time since last heartbeat
    pub fn time_since_heartbeat(&self) -> Duration {
        self.last_heartbeat.lock().elapsed()
    }

    /// Send a message to this connection, waiting for buffer space
    pub async fn send(
        &self,
        message: GatewayMessage,
    ) -> Result<(), mpsc::error::SendError<GatewayMessage>> {
        self.sender.send(message).await
    }

    /// Get a clone of the sender channel
    pub fn sender(&self) -> mpsc::Sender<GatewayMessage> {
        self.sender.clone()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("session_id", &self.session_id)
            .field("state", &self.state())
            .finish()
    }
}
