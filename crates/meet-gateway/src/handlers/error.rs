//! Handler error types

use crate::protocol::CloseCode;
use thiserror::Error;

/// Protocol faults that end the connection
///
/// Business failures of a command never surface here; they are acknowledged
/// with `ok=false` and the connection stays open.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Invalid payload received
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Identify carried an unusable identity
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// Frame requires a prior Identify
    #[error("Not identified")]
    NotIdentified,

    /// Identify sent twice
    #[error("Already identified")]
    AlreadyIdentified,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Convert to a close code
    pub fn to_close_code(&self) -> CloseCode {
        match self {
            Self::InvalidPayload(_) => CloseCode::DecodeError,
            Self::InvalidIdentity(_) => CloseCode::InvalidIdentity,
            Self::NotIdentified => CloseCode::NotIdentified,
            Self::AlreadyIdentified => CloseCode::AlreadyIdentified,
            Self::Internal(_) => CloseCode::ServerError,
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
