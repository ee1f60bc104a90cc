//! One realtime channel: registry handle, socket task and subscriptions.
//!
//! The hub keeps a [`ChannelHandle`] per key. The handle owns the sending
//! side of the outbound queue and of the event broadcast. The socket task
//! owns the WebSocket. Frames queued before the handshake completes are
//! flushed once it does.

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use futures::{SinkExt, StreamExt};
use reqwest::Url;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::errors::ChannelError;
use crate::types::{ChannelEvent, ChannelKey};
use crate::url::redacted;

pub(crate) type Registry = DashMap<ChannelKey, Arc<ChannelHandle>>;

pub(crate) enum Outbound {
    Frame(String),
    Close,
}

/// Registry entry for a live channel.
pub(crate) struct ChannelHandle {
    /// Distinguishes this socket from a later one under the same key.
    pub(crate) id: u64,
    outbound: mpsc::UnboundedSender<Outbound>,
    events: broadcast::Sender<ChannelEvent>,
}

impl ChannelHandle {
    pub(crate) fn new(
        id: u64,
        capacity: usize,
    ) -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(capacity.max(1));
        (
            Self {
                id,
                outbound,
                events,
            },
            outbound_rx,
        )
    }

    pub(crate) fn subscribe(&self, key: ChannelKey) -> ChannelSubscription {
        ChannelSubscription {
            key,
            events: self.events.subscribe(),
        }
    }

    pub(crate) fn events(&self) -> broadcast::Sender<ChannelEvent> {
        self.events.clone()
    }

    /// Queue a text frame. False once the socket task has gone.
    pub(crate) fn send(&self, text: String) -> bool {
        self.outbound.send(Outbound::Frame(text)).is_ok()
    }

    /// Ask the socket task to close gracefully.
    pub(crate) fn close(&self) {
        let _ = self.outbound.send(Outbound::Close);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Socket task
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) struct ChannelTask {
    pub(crate) key: ChannelKey,
    pub(crate) id: u64,
    pub(crate) url: Url,
    pub(crate) outbound: mpsc::UnboundedReceiver<Outbound>,
    pub(crate) events: broadcast::Sender<ChannelEvent>,
    pub(crate) registry: Weak<Registry>,
}

impl ChannelTask {
    /// Drive the socket until it closes or fails, then deregister.
    pub(crate) async fn run(mut self) {
        let outcome = self.drive().await;
        self.deregister();
        match outcome {
            Ok(()) => debug!(channel = %self.key, "channel closed"),
            Err(e) => {
                warn!(channel = %self.key, error = %e, "channel failed");
                let _ = self.events.send(ChannelEvent::Failed(e.to_string()));
            }
        }
    }

    async fn drive(&mut self) -> Result<(), ChannelError> {
        debug!(channel = %self.key, url = %redacted(&self.url), "opening channel");
        // Frames queued during the handshake are held back; a close request
        // abandons the handshake.
        let mut pending = Vec::new();
        let connect = connect_async(self.url.as_str());
        tokio::pin!(connect);
        let ws = loop {
            tokio::select! {
                result = &mut connect => break result?.0,
                out = self.outbound.recv() => match out {
                    Some(Outbound::Frame(text)) => pending.push(text),
                    Some(Outbound::Close) | None => {
                        debug!(channel = %self.key, "closed during handshake");
                        return Ok(());
                    }
                },
            }
        };
        debug!(channel = %self.key, "channel open");
        let (mut sink, mut stream) = ws.split();
        for text in pending {
            sink.send(Message::Text(text.into())).await?;
        }

        loop {
            tokio::select! {
                out = self.outbound.recv() => match out {
                    Some(Outbound::Frame(text)) => sink.send(Message::Text(text.into())).await?,
                    Some(Outbound::Close) | None => {
                        let _ = sink.close().await;
                        return Ok(());
                    }
                },
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        let value: Value =
                            serde_json::from_str(&text).map_err(ChannelError::MalformedFrame)?;
                        let _ = self.events.send(ChannelEvent::Message(value));
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(channel = %self.key, "closed by server");
                        return Ok(());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                },
            }
        }
    }

    /// Remove this socket's entry, leaving any newer socket under the same
    /// key in place.
    fn deregister(&self) {
        if let Some(registry) = self.registry.upgrade() {
            let _ = registry.remove_if(&self.key, |_, handle| handle.id == self.id);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Subscription
// ─────────────────────────────────────────────────────────────────────────────

/// A subscriber's view of a channel. Events published before the
/// subscription was created are not replayed.
#[derive(Debug)]
pub struct ChannelSubscription {
    key: ChannelKey,
    events: broadcast::Receiver<ChannelEvent>,
}

impl ChannelSubscription {
    /// Channel this subscription listens to.
    pub fn key(&self) -> &ChannelKey {
        &self.key
    }

    /// Next event, or `None` once the channel is gone. Events missed by a
    /// lagging subscriber are skipped.
    pub async fn recv(&mut self) -> Option<ChannelEvent> {
        loop {
            match self.events.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(channel = %self.key, skipped, "subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Adapt into a [`futures::Stream`] of events.
    pub fn into_stream(self) -> impl futures::Stream<Item = ChannelEvent> + Send + 'static {
        tokio_stream::StreamExt::filter_map(
            tokio_stream::wrappers::BroadcastStream::new(self.events),
            Result::ok,
        )
    }
}
