//! Close codes sent when the gateway ends a socket
//!
//! Only protocol faults close a connection. A failed command is answered
//! with an `ok=false` Ack instead.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum CloseCode {
    /// Server-side fault while handling a frame
    ServerError = 4000,
    /// Op code unknown, or a server-only op sent by the client
    UnknownOpcode = 4001,
    /// Frame or payload could not be decoded
    DecodeError = 4002,
    /// Room or command frame before Identify
    NotIdentified = 4003,
    /// Identify with a blank or malformed user id
    InvalidIdentity = 4004,
    /// Second Identify on the same socket
    AlreadyIdentified = 4005,
    /// No heartbeat within the timeout window
    HeartbeatTimeout = 4009,
}

impl CloseCode {
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Human-readable reason carried in the close frame
    pub const fn reason(self) -> &'static str {
        match self {
            Self::ServerError => "server error",
            Self::UnknownOpcode => "unknown op code",
            Self::DecodeError => "undecodable frame",
            Self::NotIdentified => "identify first",
            Self::InvalidIdentity => "invalid identity",
            Self::AlreadyIdentified => "already identified",
            Self::HeartbeatTimeout => "heartbeat timed out",
        }
    }

    /// Whether a client can reconnect and identify again with the same data
    ///
    /// Codes caused by the client's own identity or ordering mistakes will
    /// recur on reconnect.
    pub const fn is_recoverable(self) -> bool {
        matches!(
            self,
            Self::ServerError | Self::DecodeError | Self::HeartbeatTimeout
        )
    }
}

impl TryFrom<u16> for CloseCode {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Ok(match value {
            4000 => Self::ServerError,
            4001 => Self::UnknownOpcode,
            4002 => Self::DecodeError,
            4003 => Self::NotIdentified,
            4004 => Self::InvalidIdentity,
            4005 => Self::AlreadyIdentified,
            4009 => Self::HeartbeatTimeout,
            other => return Err(other),
        })
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CloseCode; 7] = [
        CloseCode::ServerError,
        CloseCode::UnknownOpcode,
        CloseCode::DecodeError,
        CloseCode::NotIdentified,
        CloseCode::InvalidIdentity,
        CloseCode::AlreadyIdentified,
        CloseCode::HeartbeatTimeout,
    ];

    #[test]
    fn test_codes_parse_from_wire_value() {
        for code in ALL {
            assert_eq!(CloseCode::try_from(code.as_u16()), Ok(code));
        }
        assert_eq!(CloseCode::try_from(1000), Err(1000));
        assert_eq!(CloseCode::try_from(4006), Err(4006));
    }

    #[test]
    fn test_identity_mistakes_are_not_recoverable() {
        assert!(CloseCode::HeartbeatTimeout.is_recoverable());
        assert!(!CloseCode::NotIdentified.is_recoverable());
        assert!(!CloseCode::InvalidIdentity.is_recoverable());
        assert!(!CloseCode::AlreadyIdentified.is_recoverable());
    }

    #[test]
    fn test_display_includes_code() {
        assert_eq!(CloseCode::NotIdentified.to_string(), "4003 identify first");
    }
}
