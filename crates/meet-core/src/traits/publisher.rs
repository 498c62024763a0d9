//! Room publisher port
//!
//! Services hand committed events to this port while still holding the
//! meeting's write lock, so delivery order matches commit order.

use crate::events::DomainEvent;
use crate::value_objects::ConnectionId;

/// Fan-out of room events to connected clients
pub trait EventPublisher: Send + Sync {
    /// Deliver an event to every member of its meeting's room
    ///
    /// Must not block. `exclude` suppresses the echo to the originating
    /// connection. Returns the number of connections the event was queued for.
    fn publish(&self, event: &DomainEvent, exclude: Option<ConnectionId>) -> usize;
}

/// Publisher that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

impl EventPublisher for NoopPublisher {
    fn publish(&self, _event: &DomainEvent, _exclude: Option<ConnectionId>) -> usize {
        0
    }
}
