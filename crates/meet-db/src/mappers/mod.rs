//! Entity to model mappers
//!
//! `From<Model> for Entity` turns rows into domain objects. Rows that need
//! joined data (messages and their reactions) go through helper functions.

mod candidate;
mod meeting;
mod message;
mod selection;
mod vote;

pub use message::message_with_reactions;
