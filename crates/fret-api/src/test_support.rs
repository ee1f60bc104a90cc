//! Fixtures for endpoint tests.

use std::sync::Arc;

use fret_auth::{LogNavigator, MemoryTokenStore, SessionConfig, SessionManager};
use wiremock::MockServer;

use crate::ApiClient;

/// Client with a stored token pair, pointed at `base`.
pub(crate) fn client_for_base(base: &str) -> ApiClient {
    let session = SessionManager::new(
        reqwest::Client::new(),
        SessionConfig::new(base),
        Arc::new(MemoryTokenStore::with_pair("a1", "r1")),
        Arc::new(LogNavigator),
    );
    ApiClient::from_session(&session)
}

/// Client against `server` under `/api/v1`.
pub(crate) fn client_for(server: &MockServer) -> ApiClient {
    client_for_base(&format!("{}/api/v1", server.uri()))
}
