//! Channel identity and events.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ChannelError;

/// Kind of realtime feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelType {
    /// Live driver positions for one order.
    Tracking,
    /// Status changes of one order.
    Order,
    /// One conversation.
    Chat,
}

impl ChannelType {
    /// All channel types.
    pub const ALL: [Self; 3] = [Self::Tracking, Self::Order, Self::Chat];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tracking => "tracking",
            Self::Order => "order",
            Self::Chat => "chat",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelType {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| ChannelError::UnknownType(s.to_string()))
    }
}

/// Registry key: one live socket per `(type, id)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChannelKey {
    /// Feed kind.
    pub channel_type: ChannelType,
    /// Resource ID (order or conversation).
    pub id: String,
}

impl ChannelKey {
    /// Key for `(channel_type, id)`.
    pub fn new(channel_type: ChannelType, id: impl Into<String>) -> Self {
        Self {
            channel_type,
            id: id.into(),
        }
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.channel_type, self.id)
    }
}

/// What a subscriber observes on a channel.
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelEvent {
    /// A JSON frame from the server.
    Message(Value),
    /// The channel broke. The stream ends right after this event.
    Failed(String),
}

impl ChannelEvent {
    /// Decode a message into a typed payload.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ChannelError> {
        match self {
            Self::Message(value) => {
                T::deserialize(value).map_err(ChannelError::MalformedFrame)
            }
            Self::Failed(reason) => Err(ChannelError::Failed(reason.clone())),
        }
    }

    /// The JSON payload, if this is a message.
    pub fn as_message(&self) -> Option<&Value> {
        match self {
            Self::Message(value) => Some(value),
            Self::Failed(_) => None,
        }
    }
}
