//! Conversations and messages.

use serde::{Deserialize, Serialize};

/// Kind of chat message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    /// Plain text.
    #[default]
    Text,
    /// Image attachment.
    Image,
    /// Generated by the platform.
    System,
}

/// A persisted chat message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message ID.
    pub id: String,
    /// Conversation ID.
    pub conversation: String,
    /// Sender account ID.
    pub sender: String,
    /// Sender display name.
    #[serde(default)]
    pub sender_name: String,
    /// Message body.
    #[serde(default)]
    pub content: String,
    /// Message kind.
    #[serde(default)]
    pub message_type: MessageType,
    /// Attachment URL.
    #[serde(default)]
    pub attachment: Option<String>,
    /// Whether the current user has read it.
    #[serde(default)]
    pub is_read: bool,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: String,
}

/// A conversation attached to an order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation ID.
    pub id: String,
    /// Order ID.
    pub order: String,
    /// Order reference.
    #[serde(default)]
    pub order_reference: String,
    /// Participant account IDs.
    #[serde(default)]
    pub participants: Vec<String>,
    /// Most recent message.
    #[serde(default)]
    pub last_message: Option<Message>,
    /// Unread messages for the current user.
    #[serde(default)]
    pub unread_count: u32,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: String,
}
