//! Frame payload definitions
//!
//! Payload structures carried in the `d` field of gateway frames.

use meet_common::ErrorResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::Command;

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    /// Default heartbeat interval (45 seconds)
    pub const DEFAULT_HEARTBEAT_INTERVAL: u64 = 45_000;

    /// Create a new Hello payload with default interval
    #[must_use]
    pub fn new() -> Self {
        Self {
            heartbeat_interval: Self::DEFAULT_HEARTBEAT_INTERVAL,
        }
    }

    /// Create a Hello payload with custom interval
    #[must_use]
    pub fn with_interval(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }
}

impl Default for HelloPayload {
    fn default() -> Self {
        Self::new()
    }
}

/// Payload for op 2 (Identify)
///
/// The identity is trusted as given.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyPayload {
    #[validate(length(min = 1, max = 64, message = "User id must be 1-64 characters"))]
    pub user_id: String,

    /// Falls back to the user id when empty
    #[serde(default)]
    #[validate(length(max = 100, message = "Display name must be at most 100 characters"))]
    pub display_name: String,
}

impl IdentifyPayload {
    /// Name shown to other room members
    pub fn name(&self) -> &str {
        let trimmed = self.display_name.trim();
        if trimmed.is_empty() {
            self.user_id.trim()
        } else {
            trimmed
        }
    }
}

/// Payload for op 3 (JoinRoom) and op 4 (LeaveRoom)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoomPayload {
    #[validate(length(min = 1, max = 64, message = "Meeting id must be 1-64 characters"))]
    pub meeting_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

/// Payload for op 5 (Command)
#[derive(Debug, Clone, Deserialize)]
pub struct CommandEnvelope {
    /// Echoed back in the acknowledgement
    #[serde(default)]
    pub nonce: Option<String>,

    pub command: Command,
}

/// Payload for op 6 (Ack)
#[derive(Debug, Clone, Serialize)]
pub struct AckPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl AckPayload {
    #[must_use]
    pub fn success(nonce: Option<String>, data: Value) -> Self {
        Self {
            nonce,
            ok: true,
            error: None,
            data: Some(data),
        }
    }

    #[must_use]
    pub fn failure(nonce: Option<String>, error: ErrorResponse) -> Self {
        Self {
            nonce,
            ok: false,
            error: Some(error),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_payload() {
        let json = serde_json::to_value(HelloPayload::new()).unwrap();
        assert_eq!(json["heartbeatInterval"], 45_000);
    }

    #[test]
    fn test_identify_name_fallback() {
        let payload: IdentifyPayload = serde_json::from_str(r#"{"userId":"u1"}"#).unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.name(), "u1");

        let payload: IdentifyPayload =
            serde_json::from_str(r#"{"userId":"u1","displayName":" Alice "}"#).unwrap();
        assert_eq!(payload.name(), "Alice");
    }

    #[test]
    fn test_identify_rejects_empty_user() {
        let payload: IdentifyPayload = serde_json::from_str(r#"{"userId":""}"#).unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_ack_shapes() {
        let ok = serde_json::to_value(AckPayload::success(
            Some("n1".into()),
            serde_json::json!({"action": "cast"}),
        ))
        .unwrap();
        assert_eq!(ok["nonce"], "n1");
        assert_eq!(ok["ok"], true);
        assert!(ok.get("error").is_none());

        let failed = serde_json::to_value(AckPayload::failure(
            None,
            ErrorResponse::new("UNKNOWN_CANDIDATE", "Candidate not found: p9"),
        ))
        .unwrap();
        assert_eq!(failed["ok"], false);
        assert_eq!(failed["error"]["code"], "UNKNOWN_CANDIDATE");
        assert!(failed.get("nonce").is_none());
        assert!(failed.get("data").is_none());
    }
}
