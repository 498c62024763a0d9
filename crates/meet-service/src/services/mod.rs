//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod consensus;
pub mod context;
pub mod error;
pub mod game;
pub mod locks;
pub mod recommendation;
pub mod selection;

// Re-export all services for convenience
pub use consensus::ConsensusService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use game::GameSessionManager;
pub use locks::{MeetingGuard, MeetingLocks};
pub use recommendation::RecommendationService;
pub use selection::SelectionService;
