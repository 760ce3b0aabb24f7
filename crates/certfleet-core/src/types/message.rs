use serde::{Deserialize, Serialize};

/// Task text sent to devices whose certificate must be rotated
pub const ROTATION_TASK: &str = "Rotate Certificate!";

/// Body returned to the event invoker after a notifier run
pub const ROTATION_ACK_BODY: &str = "Executed Certificate Rotation Initiation Event!";

/// MQTT delivery guarantee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Qos {
    /// Fire and forget
    AtMostOnce,
    /// Delivered at least once
    #[default]
    AtLeastOnce,
}

impl Qos {
    /// Numeric QoS level
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::AtMostOnce => 0,
            Self::AtLeastOnce => 1,
        }
    }
}

impl std::fmt::Display for Qos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// Payload published to a device asking it to rotate a certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationRequest {
    /// Task description
    pub task: String,
}

impl Default for RotationRequest {
    fn default() -> Self {
        Self {
            task: ROTATION_TASK.to_string(),
        }
    }
}

/// Topic a device listens on for rotation requests of one certificate
#[must_use]
pub fn rotation_topic(thing_name: &str, certificate_id: &str) -> String {
    format!("thing/{thing_name}/cert/{certificate_id}/rotate")
}

/// Structured acknowledgement returned by the event handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acknowledgement {
    /// HTTP-style status code
    pub status_code: u16,

    /// JSON-encoded body
    pub body: String,
}

impl Acknowledgement {
    /// The fixed success acknowledgement of the rotation notifier
    #[must_use]
    pub fn rotation_initiated() -> Self {
        Self {
            status_code: 200,
            body: format!("\"{ROTATION_ACK_BODY}\""),
        }
    }
}
