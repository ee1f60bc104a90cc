//! In-app notifications.

use serde::{Deserialize, Serialize};

/// What a notification is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum NotificationType {
    OrderPosted,
    BidReceived,
    BidAccepted,
    BidRejected,
    OrderAssigned,
    OrderPickedUp,
    OrderInTransit,
    OrderDelivered,
    OrderCancelled,
    PaymentReceived,
    PaymentFailed,
    NewMessage,
    System,
    /// A type this client does not know yet.
    #[serde(other)]
    Other,
}

/// A notification addressed to the current user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification ID.
    pub id: String,
    /// Kind.
    pub notification_type: NotificationType,
    /// Title line.
    #[serde(default)]
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub body: String,
    /// Deep-link payload.
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
    /// Read flag.
    #[serde(default)]
    pub is_read: bool,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: String,
}
