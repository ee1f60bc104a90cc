//! Payloads carried on realtime channels.
//!
//! Inbound frames are JSON objects discriminated by a `type` field. Frames
//! whose `type` this client does not know decode to the `Other` variant
//! instead of failing, so a newer backend cannot break older clients.

use serde::{Deserialize, Serialize};

use crate::messaging::MessageType;

/// Inbound event on a tracking channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackingEvent {
    /// A driver reported a new position.
    LocationUpdate(LocationUpdate),
    /// The order changed status.
    StatusUpdate {
        /// New status wire name.
        #[serde(default)]
        status: String,
    },
    /// The driver arrived at the delivery point.
    Arrival {
        /// Arrival timestamp.
        #[serde(default)]
        timestamp: String,
    },
    /// Unknown event type.
    #[serde(other)]
    Other,
}

/// Position broadcast for an order being tracked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    /// Driver account ID.
    pub driver_id: String,
    /// Driver display name.
    #[serde(default)]
    pub driver_name: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Speed in km/h.
    #[serde(default)]
    pub speed: Option<f64>,
    /// Bearing in degrees.
    #[serde(default)]
    pub bearing: Option<f64>,
    /// ISO-8601 fix timestamp.
    #[serde(default)]
    pub timestamp: String,
}

/// Inbound event on a chat channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A participant posted a message.
    ChatMessage(ChatMessage),
    /// A participant read the conversation.
    ReadReceipt {
        /// Reader account ID.
        #[serde(default)]
        sender: String,
    },
    /// A participant is typing.
    Typing {
        /// Typist account ID.
        #[serde(default)]
        sender: String,
    },
    /// A participant opened the conversation.
    UserJoined {
        /// Joining account ID.
        #[serde(default)]
        sender: String,
    },
    /// Unknown event type.
    #[serde(other)]
    Other,
}

/// A chat message as broadcast to conversation members.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Persisted message ID.
    pub message_id: String,
    /// Sender account ID.
    pub sender_id: String,
    /// Sender display name.
    #[serde(default)]
    pub sender_name: String,
    /// Message kind.
    #[serde(default)]
    pub message_type: MessageType,
    /// Message body.
    #[serde(default)]
    pub content: String,
    /// ISO-8601 creation timestamp.
    #[serde(default)]
    pub timestamp: String,
}

/// Outbound chat frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatOutbound {
    /// Message kind.
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// Message body.
    pub content: String,
}

impl ChatOutbound {
    /// A plain text message.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::Text,
            content: content.into(),
        }
    }
}

/// Outbound GPS fix streamed by a driver.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsPing {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Order the fix belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Accuracy in meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Speed in km/h.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Bearing in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearing: Option<f64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
