//! Event broadcasting
//!
//! Delivers committed meeting events to the connections in each meeting's room.

mod room;

pub use room::RoomBroadcaster;
