//! Ports - traits implemented by infrastructure

mod places;
mod publisher;
mod repositories;

pub use places::{PlacesProvider, TravelEstimate};
pub use publisher::{EventPublisher, NoopPublisher};
pub use repositories::{
    CandidateRepository, MeetingRepository, MessageRepository, RepoResult, SelectionRepository,
    VoteRepository,
};
