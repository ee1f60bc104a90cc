//! API client core.

use fret_auth::{RequestGateway, SessionManager};

/// REST client bound to a session.
#[derive(Clone, Debug)]
pub struct ApiClient {
    gateway: RequestGateway,
    base: String,
}

impl ApiClient {
    /// Client sending through `gateway` to endpoints under `base_url`.
    pub fn new(gateway: RequestGateway, base_url: &str) -> Self {
        Self {
            gateway,
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Client for the session's API base.
    pub fn from_session(session: &SessionManager) -> Self {
        Self::new(session.gateway(), session.endpoints().base())
    }

    /// Underlying gateway.
    pub fn gateway(&self) -> &RequestGateway {
        &self.gateway
    }

    /// API base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }
}
