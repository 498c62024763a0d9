//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in meet-core.

mod candidate;
mod error;
mod meeting;
mod message;
mod selection;
mod vote;

pub use candidate::PgCandidateRepository;
pub use meeting::PgMeetingRepository;
pub use message::PgMessageRepository;
pub use selection::PgSelectionRepository;
pub use vote::PgVoteRepository;
