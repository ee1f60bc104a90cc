//! Shared fixtures for session and gateway tests.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};
use wiremock::MockServer;

use crate::navigation::{Navigator, Route};
use crate::session::{SessionConfig, SessionManager};
use crate::storage::MemoryTokenStore;

/// Navigator that remembers every request.
#[derive(Default)]
pub(crate) struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub(crate) fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().push(route);
    }
}

pub(crate) struct Harness {
    pub(crate) session: SessionManager,
    pub(crate) store: Arc<MemoryTokenStore>,
    pub(crate) navigator: Arc<RecordingNavigator>,
}

/// API base URL served by `server`.
pub(crate) fn api_base(server: &MockServer) -> String {
    format!("{}/api/v1", server.uri())
}

/// Session against `server` with the given store contents.
pub(crate) fn harness(server: &MockServer, store: MemoryTokenStore, coalesce: bool) -> Harness {
    let store = Arc::new(store);
    let navigator = Arc::new(RecordingNavigator::default());
    let config = SessionConfig {
        api_base_url: api_base(server),
        coalesce_refresh: coalesce,
    };
    let session = SessionManager::new(
        reqwest::Client::new(),
        config,
        store.clone(),
        navigator.clone(),
    );
    Harness {
        session,
        store,
        navigator,
    }
}

/// `accounts/me/` style user body.
pub(crate) fn user_json(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "phone_number": "+221770000001",
        "full_name": "Awa Ndiaye",
        "role": role,
        "is_verified": true,
        "is_active": true,
        "date_joined": "2026-01-01T00:00:00Z"
    })
}

/// Requests `server` received for `path`.
pub(crate) async fn hits(server: &MockServer, path: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == path)
        .collect()
}
