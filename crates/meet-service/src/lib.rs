//! # meet-service
//!
//! Application layer: the consensus store, location recommendation and
//! mini-game sessions, plus the DTOs the gateway speaks.
//!
//! Services borrow a [`ServiceContext`] and are cheap to construct per call:
//!
//! ```rust,ignore
//! let ctx = ServiceContextBuilder::new().in_memory().publisher(rooms).build()?;
//! let tally = ConsensusService::new(&ctx).get_tally(&meeting_id).await?;
//! ```

pub mod dto;
pub mod recommend;
pub mod services;

#[cfg(test)]
mod testing;

pub use services::{
    ConsensusService, GameSessionManager, MeetingLocks, RecommendationService, SelectionService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
