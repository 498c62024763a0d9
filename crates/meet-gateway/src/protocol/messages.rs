//! Frame envelope
//!
//! Every text frame is `{op, t?, s?, d?}`. `t` and `s` appear only on
//! Dispatch frames; `d` holds the op-specific payload.

use super::{AckPayload, CloseCode, CommandEnvelope, HelloPayload, IdentifyPayload, OpCode, RoomPayload};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    pub op: OpCode,

    /// Event type of a Dispatch, e.g. `vote-updated`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Per-room sequence number of a Dispatch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

/// Why an incoming frame could not be read
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Malformed frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unknown op code: {0}")]
    UnknownOpcode(u64),
}

impl FrameError {
    pub fn close_code(&self) -> CloseCode {
        match self {
            Self::Decode(_) => CloseCode::DecodeError,
            Self::UnknownOpcode(_) => CloseCode::UnknownOpcode,
        }
    }
}

impl GatewayMessage {
    fn reply(op: OpCode, d: Option<Value>) -> Self {
        Self { op, t: None, s: None, d }
    }

    /// Room event frame; `sequence` is assigned by the room
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            t: Some(event_type.into()),
            s: Some(sequence),
            d: Some(data),
        }
    }

    pub fn ack(payload: AckPayload) -> Self {
        Self::reply(OpCode::Ack, serde_json::to_value(payload).ok())
    }

    pub fn hello(payload: HelloPayload) -> Self {
        Self::reply(OpCode::Hello, serde_json::to_value(payload).ok())
    }

    pub fn heartbeat_ack() -> Self {
        Self::reply(OpCode::HeartbeatAck, None)
    }

    /// Parse a client text frame
    ///
    /// An `op` outside the assigned codes is reported separately from
    /// malformed JSON, since the two close with different codes.
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let value: Value = serde_json::from_str(text)?;
        if let Some(op) = value.get("op").and_then(Value::as_u64) {
            let assigned = u8::try_from(op).is_ok_and(|v| OpCode::try_from(v).is_ok());
            if !assigned {
                return Err(FrameError::UnknownOpcode(op));
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Decode `d` when the frame carries one of `ops`
    fn payload<T: DeserializeOwned>(&self, ops: &[OpCode]) -> Option<T> {
        if !ops.contains(&self.op) {
            return None;
        }
        serde_json::from_value(self.d.clone()?).ok()
    }

    pub fn as_identify(&self) -> Option<IdentifyPayload> {
        self.payload(&[OpCode::Identify])
    }

    pub fn as_room(&self) -> Option<RoomPayload> {
        self.payload(&[OpCode::JoinRoom, OpCode::LeaveRoom])
    }

    pub fn as_command(&self) -> Option<CommandEnvelope> {
        self.payload(&[OpCode::Command])
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.op)?;
        if let Some(t) = &self.t {
            write!(f, " {t}")?;
        }
        if let Some(s) = self.s {
            write!(f, " #{s}")?;
        }
        Ok(())
    }
}
