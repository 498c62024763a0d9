//! Connection management
//!
//! Tracks WebSocket connections and their declared identities.

mod connection;
mod manager;

pub use connection::{Connection, ConnectionState};
pub use manager::ConnectionManager;
