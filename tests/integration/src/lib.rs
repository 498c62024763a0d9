//! Integration test utilities for the meeting gateway
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST routes and the WebSocket gateway.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
