//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{MeetingId, MessageId, PlaceId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Meeting not found: {0}")]
    MeetingNotFound(MeetingId),

    #[error("Candidate place not found: {0}")]
    CandidateNotFound(PlaceId),

    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    #[error("No game session for meeting: {0}")]
    GameNotFound(MeetingId),

    #[error("No vote recorded for voter: {0}")]
    VoteNotFound(UserId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Only the organizer or the proposer may remove this candidate")]
    NotOrganizerOrProposer,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Place already proposed for this meeting: {0}")]
    DuplicateCandidate(PlaceId),

    #[error("Meeting already registered: {0}")]
    MeetingAlreadyExists(MeetingId),

    // =========================================================================
    // Upstream Errors
    // =========================================================================
    #[error("Upstream provider unavailable: {0}")]
    UpstreamUnavailable(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::MeetingNotFound(_) => "UNKNOWN_MEETING",
            Self::CandidateNotFound(_) => "UNKNOWN_CANDIDATE",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::GameNotFound(_) => "UNKNOWN_GAME",
            Self::VoteNotFound(_) => "UNKNOWN_VOTE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            // Authorization
            Self::NotOrganizerOrProposer => "FORBIDDEN",

            // Conflict
            Self::DuplicateCandidate(_) => "DUPLICATE_CANDIDATE",
            Self::MeetingAlreadyExists(_) => "MEETING_ALREADY_EXISTS",

            // Upstream
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MeetingNotFound(_)
                | Self::CandidateNotFound(_)
                | Self::MessageNotFound(_)
                | Self::GameNotFound(_)
                | Self::VoteNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::ContentTooLong { .. })
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotOrganizerOrProposer)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateCandidate(_) | Self::MeetingAlreadyExists(_)
        )
    }

    /// Check if the caller may retry the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_))
    }

    /// HTTP status the error maps to at the edge
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_authorization() {
            403
        } else if self.is_validation() {
            400
        } else if self.is_conflict() {
            409
        } else if self.is_retryable() {
            503
        } else {
            500
        }
    }
}
