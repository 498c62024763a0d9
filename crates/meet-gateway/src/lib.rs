//! # meet-gateway
//!
//! WebSocket gateway for meeting rooms, plus the REST endpoints served on
//! the same listener.
//!
//! A client connects to `/gateway`, receives Hello, sends Identify, then
//! joins meeting rooms and issues commands. Every state change is broadcast
//! to the room as a Dispatch frame with a per-room sequence number.

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod rest;
pub mod server;

pub use server::{create_app, create_gateway_state, run, serve, GatewayState};
