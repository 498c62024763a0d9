//! Gateway protocol definitions
//!
//! Defines the WebSocket protocol including op codes, frame formats, commands and close codes.

mod close_codes;
mod commands;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use commands::Command;
pub use messages::{FrameError, GatewayMessage};
pub use opcodes::{OpCode, Sender};
pub use payloads::{AckPayload, CommandEnvelope, HelloPayload, IdentifyPayload, RoomPayload};
