//! Events pushed to channels and frames received from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::design::model::DesignSubmission;
use crate::error::{RelayError, RelayResult};

/// Events the relay writes to push channels.
#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum RelayEvent {
    /// Greeting sent to a channel right after it opens.
    ConnectionEstablished { message: String, timestamp: String },
    /// Keepalive reply to a `ping`.
    Pong { timestamp: String },
    /// Reply to a `register` frame.
    RegistrationAcknowledged { client_id: Value },
    /// A design submission finished processing.
    DesignProcessed(DesignSubmission),
}

impl RelayEvent {
    pub fn connection_established() -> Self {
        Self::ConnectionEstablished {
            message: "Connected to card relay".to_string(),
            timestamp: crate::now_timestamp(),
        }
    }

    pub fn pong() -> Self {
        Self::Pong {
            timestamp: crate::now_timestamp(),
        }
    }

    pub fn registration_acknowledged(client_id: Value) -> Self {
        Self::RegistrationAcknowledged { client_id }
    }

    /// Wire tag of this event.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionEstablished { .. } => "connection-established",
            Self::Pong { .. } => "pong",
            Self::RegistrationAcknowledged { .. } => "registration-acknowledged",
            Self::DesignProcessed(_) => "design-processed",
        }
    }

    /// Serialize to the text frame sent over a channel.
    pub fn to_json(&self) -> RelayResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A raw `{type, data}` frame received from a client.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientFrame {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

/// What a client frame asks the relay to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    Ping,
    Register { device_id: Value },
    Unknown(String),
}

impl ClientFrame {
    /// Parse a text frame. Anything that is not a JSON object with a string
    /// `type` is a [`RelayError::Parse`].
    pub fn parse(text: &str) -> RelayResult<Self> {
        serde_json::from_str(text).map_err(|e| RelayError::Parse(e.to_string()))
    }

    pub fn command(&self) -> ClientCommand {
        match self.kind.as_str() {
            "ping" => ClientCommand::Ping,
            "register" => {
                // Missing, null, and empty ids all fall back to "unknown".
                let device_id = match self.data.get("deviceId") {
                    None | Some(Value::Null) => Value::String("unknown".to_string()),
                    Some(Value::String(id)) if id.is_empty() => Value::String("unknown".to_string()),
                    Some(id) => id.clone(),
                };
                ClientCommand::Register { device_id }
            }
            other => ClientCommand::Unknown(other.to_string()),
        }
    }
}
