//! Gateway operation codes
//!
//! Every frame carries an `op`. Codes are split by sender: the server
//! closes the socket with `UnknownOpcode` when a client sends a server op.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum OpCode {
    /// Room event with a per-room sequence number
    Dispatch = 0,
    Heartbeat = 1,
    /// Declares the acting user for the rest of the connection
    Identify = 2,
    JoinRoom = 3,
    LeaveRoom = 4,
    /// Meeting command wrapped in an optional nonce
    Command = 5,
    /// Reply to Identify, JoinRoom, LeaveRoom and Command
    Ack = 6,
    /// First frame after connect, announces the heartbeat interval
    Hello = 10,
    HeartbeatAck = 11,
}

/// Which side of the socket may send an op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Client,
    Server,
}

impl OpCode {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn sender(self) -> Sender {
        match self {
            Self::Heartbeat | Self::Identify | Self::JoinRoom | Self::LeaveRoom | Self::Command => {
                Sender::Client
            }
            Self::Dispatch | Self::Ack | Self::Hello | Self::HeartbeatAck => Sender::Server,
        }
    }

    pub const fn is_client_op(self) -> bool {
        matches!(self.sender(), Sender::Client)
    }

    /// Ops that act on behalf of a user and need Identify first
    pub const fn requires_identity(self) -> bool {
        matches!(self, Self::JoinRoom | Self::LeaveRoom | Self::Command)
    }
}

impl TryFrom<u8> for OpCode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Dispatch,
            1 => Self::Heartbeat,
            2 => Self::Identify,
            3 => Self::JoinRoom,
            4 => Self::LeaveRoom,
            5 => Self::Command,
            6 => Self::Ack,
            10 => Self::Hello,
            11 => Self::HeartbeatAck,
            other => return Err(format!("invalid op code: {other}")),
        })
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self {
        op.as_u8()
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?} ({})", self.as_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unassigned_codes_are_rejected() {
        assert_eq!(OpCode::try_from(5), Ok(OpCode::Command));
        assert!(OpCode::try_from(7).is_err());
        assert!(OpCode::try_from(255).is_err());
    }

    #[test]
    fn test_every_code_has_one_sender() {
        let client: Vec<u8> = (0..=u8::MAX)
            .filter_map(|v| OpCode::try_from(v).ok())
            .filter(|op| op.is_client_op())
            .map(OpCode::as_u8)
            .collect();
        assert_eq!(client, vec![1, 2, 3, 4, 5]);
        assert_eq!(OpCode::Hello.sender(), Sender::Server);
    }

    #[test]
    fn test_identity_requirement() {
        assert!(OpCode::Command.requires_identity());
        assert!(OpCode::JoinRoom.requires_identity());
        assert!(!OpCode::Heartbeat.requires_identity());
        assert!(!OpCode::Identify.requires_identity());
    }

    #[test]
    fn test_wire_form_is_a_number() {
        assert_eq!(serde_json::to_string(&OpCode::Hello).unwrap(), "10");
        let op: OpCode = serde_json::from_str("3").unwrap();
        assert_eq!(op, OpCode::JoinRoom);
        assert!(serde_json::from_str::<OpCode>("9").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(OpCode::HeartbeatAck.to_string(), "HeartbeatAck (11)");
    }
}
