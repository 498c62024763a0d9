//! # meet-core
//!
//! Domain layer for meeting consensus: entities, value objects, geometry,
//! room events and the ports infrastructure implements.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod geo;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    selection_counts, Actor, CandidatePlace, ChatMessage, EmojiReaction, FinishReason, GameKind,
    GameOutcome, GameSession, GameStart, GameStatus, JoinOutcome, Meeting, Participant,
    ParticipantPreferences, PlaceDetails, Player, RankedResult, ReactionChange, ReactionSet,
    SelectionCount, SelectionEvent, SubmitOutcome, TallyVoter, Venue, Vote, VoteAction, VoteTally,
};
pub use error::DomainError;
pub use events::DomainEvent;
pub use traits::{
    CandidateRepository, EventPublisher, MeetingRepository, MessageRepository, NoopPublisher,
    PlacesProvider, RepoResult, SelectionRepository, TravelEstimate, VoteRepository,
};
pub use value_objects::{
    ConnectionId, Coordinates, GameId, MeetingId, MessageId, PlaceId, TravelMode, UserId,
};
