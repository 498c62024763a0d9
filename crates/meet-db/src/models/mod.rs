//! Database models - SQLx-compatible structs for PostgreSQL tables

mod candidate;
mod meeting;
mod message;
mod selection;
mod vote;

pub use candidate::CandidateModel;
pub use meeting::MeetingModel;
pub use message::{MessageModel, ReactionModel};
pub use selection::SelectionModel;
pub use vote::VoteModel;
