//! Domain events

mod domain_event;

pub use domain_event::{
    CandidateAddedEvent, CandidateRemovedEvent, DomainEvent, GameCancelledEvent,
    GameFinishedEvent, GamePlayerResultEvent, GamePlayersUpdatedEvent, GameResetEvent,
    GameStartedEvent, MessageCreatedEvent, ReactionUpdatedEvent, SelectionRecordedEvent,
    VoteUpdatedEvent,
};
