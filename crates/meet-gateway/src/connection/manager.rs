//! Connection manager
//!
//! Tracks all live WebSocket connections using DashMap for thread-safe access.

use super::Connection;
use crate::protocol::GatewayMessage;
use dashmap::DashMap;
use meet_core::{Actor, ConnectionId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Manages all active WebSocket connections
pub struct ConnectionManager {
    /// Active connections by id
    connections: DashMap<ConnectionId, Arc<Connection>>,

    next_id: AtomicU64,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection under a fresh id
    pub fn add_connection(&self, sender: mpsc::Sender<GatewayMessage>) -> Arc<Connection> {
        let id = ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let session_id = Uuid::new_v4().simple().to_string();
        let connection = Connection::new(id, session_id, sender);
        self.connections.insert(id, connection.clone());

        tracing::debug!(connection_id = %id, "Connection added");

        connection
    }

    /// Remove a connection
    pub fn remove_connection(&self, id: ConnectionId) -> Option<Arc<Connection>> {
        let (_, connection) = self.connections.remove(&id)?;

        tracing::debug!(connection_id = %id, "Connection removed");
        Some(connection)
    }

    /// Get a connection by id
    pub fn get_connection(&self, id: ConnectionId) -> Option<Arc<Connection>> {
        self.connections.get(&id).map(|r| r.clone())
    }

    /// Attach an identity to a connection
    ///
    /// Returns false if the connection is unknown or already identified.
    pub fn identify_connection(&self, id: ConnectionId, actor: Actor) -> bool {
        let Some(connection) = self.get_connection(id) else {
            return false;
        };
        let user_id = actor.id.clone();
        if !connection.identify(actor) {
            return false;
        }

        tracing::debug!(
            connection_id = %id,
            user_id = %user_id,
            "Connection identified"
        );
        true
    }

    /// Get the total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .finish()
    }
}
