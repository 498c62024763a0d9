//! Gateway state
//!
//! Application state shared by the socket handler and the REST routes.

use crate::broadcast::RoomBroadcaster;
use crate::connection::ConnectionManager;
use meet_common::{AppConfig, AppError};
use meet_core::EventPublisher;
use meet_service::{ServiceContext, ServiceContextBuilder};
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Service context with repositories, locks and game sessions
    service_context: Arc<ServiceContext>,
    /// Connection manager for WebSocket connections
    connections: Arc<ConnectionManager>,
    /// Per-meeting fan-out; also the service layer's event publisher
    rooms: Arc<RoomBroadcaster>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        service_context: ServiceContext,
        connections: Arc<ConnectionManager>,
        rooms: Arc<RoomBroadcaster>,
        config: AppConfig,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            connections,
            rooms,
            config: Arc::new(config),
        }
    }

    /// Build a state backed by the in-memory store
    pub fn in_memory(config: AppConfig) -> Result<Self, AppError> {
        let rooms = RoomBroadcaster::new_shared();
        let service_context = ServiceContextBuilder::new()
            .in_memory()
            .publisher(rooms.clone() as Arc<dyn EventPublisher>)
            .game_config(config.game.clone())
            .recommendation_config(config.recommendation.clone())
            .build()?;

        Ok(Self::new(
            service_context,
            ConnectionManager::new_shared(),
            rooms,
            config,
        ))
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the connection manager
    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    /// Get the room broadcaster
    pub fn rooms(&self) -> &RoomBroadcaster {
        &self.rooms
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("connections", &self.connections)
            .field("rooms", &self.rooms.room_count())
            .field("config", &"AppConfig")
            .finish()
    }
}
