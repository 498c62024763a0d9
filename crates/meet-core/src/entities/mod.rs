//! Domain entities - core business objects

mod actor;
mod candidate;
mod game;
mod meeting;
mod message;
mod selection;
mod venue;
mod vote;

pub use actor::Actor;
pub use candidate::{CandidatePlace, PlaceDetails};
pub use game::{
    FinishReason, GameKind, GameOutcome, GameSession, GameStart, GameStatus, JoinOutcome, Player,
    PlayerResult, RankedResult, SubmitOutcome,
};
pub use meeting::Meeting;
pub use message::{ChatMessage, EmojiReaction, ReactionChange, ReactionSet, MAX_MESSAGE_LENGTH};
pub use selection::{selection_counts, SelectionCount, SelectionEvent};
pub use venue::{Participant, ParticipantPreferences, Venue};
pub use vote::{TallyVoter, Vote, VoteAction, VoteTally};
