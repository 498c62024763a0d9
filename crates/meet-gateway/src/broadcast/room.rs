//! Room broadcaster
//!
//! In-process fan-out of meeting events to the connections that joined the
//! meeting's room. Each room is guarded by its DashMap shard lock: sequence
//! assignment and enqueueing happen under that lock, so every member sees a
//! room's events in publish order.

use crate::protocol::GatewayMessage;
use dashmap::DashMap;
use meet_core::{ConnectionId, DomainEvent, EventPublisher, MeetingId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Members of one meeting room
#[derive(Debug, Default)]
struct Room {
    members: HashMap<ConnectionId, mpsc::Sender<GatewayMessage>>,
    /// Last sequence number handed out
    sequence: u64,
}

/// Meeting id to joined connections
#[derive(Debug, Default)]
pub struct RoomBroadcaster {
    rooms: DashMap<MeetingId, Room>,
    /// Reverse index used on disconnect
    memberships: DashMap<ConnectionId, HashSet<MeetingId>>,
}

impl RoomBroadcaster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a broadcaster wrapped in Arc
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Add a connection to a room
    ///
    /// Returns false if it was already a member.
    pub fn join(
        &self,
        meeting_id: &MeetingId,
        connection_id: ConnectionId,
        sender: mpsc::Sender<GatewayMessage>,
    ) -> bool {
        let added = self
            .rooms
            .entry(meeting_id.clone())
            .or_default()
            .members
            .insert(connection_id, sender)
            .is_none();

        self.memberships
            .entry(connection_id)
            .or_default()
            .insert(meeting_id.clone());

        if added {
            tracing::debug!(meeting_id = %meeting_id, connection_id = %connection_id, "Joined room");
        }
        added
    }

    /// Remove a connection from a room
    ///
    /// Returns false if it was not a member.
    pub fn leave(&self, meeting_id: &MeetingId, connection_id: ConnectionId) -> bool {
        self.memberships.remove_if_mut(&connection_id, |_, rooms| {
            rooms.remove(meeting_id);
            rooms.is_empty()
        });

        let removed = self.remove_member(meeting_id, connection_id);
        if removed {
            tracing::debug!(meeting_id = %meeting_id, connection_id = %connection_id, "Left room");
        }
        removed
    }

    /// Remove a connection from every room it joined
    ///
    /// Returns the meetings it left.
    pub fn leave_all(&self, connection_id: ConnectionId) -> Vec<MeetingId> {
        let Some((_, rooms)) = self.memberships.remove(&connection_id) else {
            return Vec::new();
        };

        let left: Vec<MeetingId> = rooms
            .into_iter()
            .filter(|meeting_id| self.remove_member(meeting_id, connection_id))
            .collect();

        if !left.is_empty() {
            tracing::debug!(connection_id = %connection_id, rooms = left.len(), "Left all rooms");
        }
        left
    }

    /// Number of connections in a room
    pub fn room_size(&self, meeting_id: &MeetingId) -> usize {
        self.rooms.get(meeting_id).map_or(0, |room| room.members.len())
    }

    /// Number of rooms with at least one member
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Queue a dispatch frame for every member except `exclude`
    ///
    /// Never waits: a full buffer drops the frame for that member and a closed
    /// channel prunes the member.
    pub fn broadcast(
        &self,
        meeting_id: &MeetingId,
        event_type: &str,
        data: serde_json::Value,
        exclude: Option<ConnectionId>,
    ) -> usize {
        let Some(mut room) = self.rooms.get_mut(meeting_id) else {
            tracing::trace!(meeting_id = %meeting_id, event = event_type, "No room to dispatch to");
            return 0;
        };

        room.sequence += 1;
        let frame = GatewayMessage::dispatch(event_type, room.sequence, data);

        let mut sent = 0;
        let mut closed = Vec::new();
        for (id, sender) in &room.members {
            if exclude == Some(*id) {
                continue;
            }
            match sender.try_send(frame.clone()) {
                Ok(()) => sent += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        meeting_id = %meeting_id,
                        connection_id = %id,
                        event = event_type,
                        "Outbound buffer full, dropping event"
                    );
                }
                Err(TrySendError::Closed(_)) => closed.push(*id),
            }
        }

        for id in &closed {
            room.members.remove(id);
        }
        let empty = room.members.is_empty();
        let sequence = room.sequence;
        drop(room);

        for id in closed {
            tracing::debug!(meeting_id = %meeting_id, connection_id = %id, "Pruned closed connection");
            self.memberships.remove_if_mut(&id, |_, rooms| {
                rooms.remove(meeting_id);
                rooms.is_empty()
            });
        }
        if empty {
            self.rooms.remove_if(meeting_id, |_, room| room.members.is_empty());
        }

        tracing::trace!(
            meeting_id = %meeting_id,
            event = event_type,
            sequence,
            sent,
            "Event dispatched"
        );
        sent
    }

    fn remove_member(&self, meeting_id: &MeetingId, connection_id: ConnectionId) -> bool {
        let removed = self
            .rooms
            .get_mut(meeting_id)
            .is_some_and(|mut room| room.members.remove(&connection_id).is_some());
        self.rooms.remove_if(meeting_id, |_, room| room.members.is_empty());
        removed
    }
}

impl EventPublisher for RoomBroadcaster {
    fn publish(&self, event: &DomainEvent, exclude: Option<ConnectionId>) -> usize {
        self.broadcast(
            event.meeting_id(),
            event.event_type(),
            event.to_payload(),
            exclude,
        )
    }
}
