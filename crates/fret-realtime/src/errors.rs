//! Realtime channel errors.

use tokio_tungstenite::tungstenite;

/// Errors raised by the channel hub and its sockets.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The channel URL could not be built.
    #[error("invalid channel URL {url}: {reason}")]
    InvalidUrl {
        /// URL as assembled from the template.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// Unrecognized channel type name.
    #[error("unknown channel type: {0}")]
    UnknownType(String),

    /// WebSocket handshake or transport failure.
    #[error("websocket error: {0}")]
    Transport(#[from] tungstenite::Error),

    /// A frame was not the expected JSON.
    #[error("malformed frame: {0}")]
    MalformedFrame(#[source] serde_json::Error),

    /// The channel reported a failure to its subscribers.
    #[error("channel failed: {0}")]
    Failed(String),

    /// `connect` was called outside a tokio runtime.
    #[error("no tokio runtime to drive the channel")]
    NoRuntime,
}
