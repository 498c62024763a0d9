//! Value objects - immutable domain primitives

mod ids;
mod location;

pub use ids::{ConnectionId, GameId, MeetingId, MessageId, PlaceId, UserId};
pub use location::{Coordinates, TravelMode};
