//! Channel multiplexer.
//!
//! [`ChannelHub`] keeps at most one WebSocket per `(type, id)` key and fans
//! its frames out to every subscriber. Sockets are opened lazily on the
//! first [`connect`](ChannelHub::connect) and registered before the
//! handshake starts, so concurrent callers always share one socket.
//!
//! A socket that fails or is closed by the server is dropped from the
//! registry; subscribers see [`ChannelEvent::Failed`] (failures only) and
//! then the end of their stream. Reconnecting is the caller's decision.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use fret_auth::SessionManager;
use fret_settings::{ChannelTemplates, FretSettings, RealtimeSettings};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::channel::{ChannelHandle, ChannelSubscription, ChannelTask, Registry};
use crate::errors::ChannelError;
use crate::types::{ChannelKey, ChannelType};
use crate::url::{channel_url, template_for};

/// Supplies the access token appended to channel URLs.
pub trait TokenSource: Send + Sync {
    /// Current access token, read when a socket is opened.
    fn access_token(&self) -> Option<String>;
}

impl TokenSource for SessionManager {
    fn access_token(&self) -> Option<String> {
        SessionManager::access_token(self)
    }
}

/// Fixed token, for tools and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn access_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Keyed registry of realtime channels. Cheap to clone; clones share the
/// registry.
#[derive(Clone)]
pub struct ChannelHub {
    inner: Arc<HubInner>,
}

struct HubInner {
    ws_base: String,
    templates: ChannelTemplates,
    capacity: usize,
    tokens: Arc<dyn TokenSource>,
    channels: Arc<Registry>,
    next_id: AtomicU64,
}

impl ChannelHub {
    /// Hub for `settings`, reading tokens from `tokens`.
    pub fn new(settings: &RealtimeSettings, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            inner: Arc::new(HubInner {
                ws_base: settings.ws_url.clone(),
                templates: settings.templates.clone(),
                capacity: settings.channel_capacity.max(1),
                tokens,
                channels: Arc::new(DashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Hub authenticated by `session`.
    pub fn from_settings(settings: &FretSettings, session: SessionManager) -> Self {
        Self::new(&settings.realtime, Arc::new(session))
    }

    /// Subscribe to `(channel_type, id)`, opening the socket if none is live.
    ///
    /// Handshake and transport failures are reported on the subscription,
    /// not here. Errors are limited to an unusable URL or a missing runtime.
    pub fn connect(
        &self,
        channel_type: ChannelType,
        id: &str,
    ) -> Result<ChannelSubscription, ChannelError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ChannelError::NoRuntime)?;
        let key = ChannelKey::new(channel_type, id);

        let (subscription, task) = match self.inner.channels.entry(key.clone()) {
            Entry::Occupied(entry) => {
                debug!(channel = %key, "joining open channel");
                (entry.get().subscribe(key), None)
            }
            Entry::Vacant(entry) => {
                let token = self.inner.tokens.access_token();
                let url = channel_url(
                    &self.inner.ws_base,
                    template_for(&self.inner.templates, channel_type),
                    id,
                    token.as_deref(),
                )?;
                let socket_id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
                let (handle, outbound) = ChannelHandle::new(socket_id, self.inner.capacity);
                let subscription = handle.subscribe(key.clone());
                let task = ChannelTask {
                    key: key.clone(),
                    id: socket_id,
                    url,
                    outbound,
                    events: handle.events(),
                    registry: Arc::downgrade(&self.inner.channels),
                };
                let _ = entry.insert(Arc::new(handle));
                info!(channel = %key, "channel registered");
                (subscription, Some(task))
            }
        };

        if let Some(task) = task {
            let _ = runtime.spawn(task.run());
        }
        Ok(subscription)
    }

    /// Forward `payload` verbatim as a JSON text frame.
    ///
    /// Returns `false` without side effects when no channel is open under
    /// the key.
    pub fn send(&self, channel_type: ChannelType, id: &str, payload: &Value) -> bool {
        let key = ChannelKey::new(channel_type, id);
        let Some(handle) = self.handle(&key) else {
            debug!(channel = %key, "send on closed channel ignored");
            return false;
        };
        handle.send(payload.to_string())
    }

    /// Serialize `payload` and [`send`](Self::send) it.
    pub fn send_json<T: Serialize>(&self, channel_type: ChannelType, id: &str, payload: &T) -> bool {
        match serde_json::to_value(payload) {
            Ok(value) => self.send(channel_type, id, &value),
            Err(e) => {
                warn!(channel_type = %channel_type, id, error = %e, "payload not serializable");
                false
            }
        }
    }

    /// Close the channel gracefully. No-op when none is open.
    pub fn disconnect(&self, channel_type: ChannelType, id: &str) {
        let key = ChannelKey::new(channel_type, id);
        if let Some((_, handle)) = self.inner.channels.remove(&key) {
            handle.close();
            info!(channel = %key, "channel disconnected");
        }
    }

    /// Close every channel and empty the registry.
    pub fn shutdown(&self) {
        let handles: Vec<Arc<ChannelHandle>> = self
            .inner
            .channels
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        self.inner.channels.clear();
        for handle in &handles {
            handle.close();
        }
        if !handles.is_empty() {
            info!(count = handles.len(), "all channels closed");
        }
    }

    /// Whether a channel is registered under the key.
    pub fn is_open(&self, channel_type: ChannelType, id: &str) -> bool {
        self.inner
            .channels
            .contains_key(&ChannelKey::new(channel_type, id))
    }

    /// Keys of all registered channels.
    pub fn open_channels(&self) -> Vec<ChannelKey> {
        self.inner.channels.iter().map(|e| e.key().clone()).collect()
    }

    /// Number of registered channels.
    pub fn len(&self) -> usize {
        self.inner.channels.len()
    }

    /// Whether no channel is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.channels.is_empty()
    }

    fn handle(&self, key: &ChannelKey) -> Option<Arc<ChannelHandle>> {
        self.inner.channels.get(key).map(|h| Arc::clone(h.value()))
    }
}

impl std::fmt::Debug for ChannelHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelHub")
            .field("ws_base", &self.inner.ws_base)
            .field("open", &self.len())
            .finish_non_exhaustive()
    }
}
