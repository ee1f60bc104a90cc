//! Realtime channel settings.

use serde::{Deserialize, Serialize};

/// WebSocket channel settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RealtimeSettings {
    /// Base WebSocket URL channel paths are joined to.
    pub ws_url: String,
    /// Per-channel-type path templates.
    pub templates: ChannelTemplates,
    /// Buffered inbound events per channel before slow subscribers lag.
    pub channel_capacity: usize,
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        Self {
            ws_url: "ws://localhost:8000/ws".to_string(),
            templates: ChannelTemplates::default(),
            channel_capacity: 64,
        }
    }
}

/// Path templates, relative to the WebSocket base URL.
///
/// `{id}` is replaced by the resource ID.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelTemplates {
    /// Live tracking of one order.
    pub tracking: String,
    /// Generic updates for one order.
    pub order: String,
    /// One conversation.
    pub chat: String,
}

impl ChannelTemplates {
    /// Placeholder substituted with the resource ID.
    pub const ID_PLACEHOLDER: &'static str = "{id}";

    /// `(name, template)` pairs for validation and display.
    pub fn entries(&self) -> [(&'static str, &str); 3] {
        [
            ("tracking", self.tracking.as_str()),
            ("order", self.order.as_str()),
            ("chat", self.chat.as_str()),
        ]
    }
}

impl Default for ChannelTemplates {
    fn default() -> Self {
        Self {
            tracking: "tracking/order/{id}/".to_string(),
            order: "orders/{id}/".to_string(),
            chat: "chat/{id}/".to_string(),
        }
    }
}
