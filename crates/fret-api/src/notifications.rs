//! Notification endpoints.

use fret_core::Page;
use fret_core::notifications::Notification;
use serde_json::Map;

use crate::{ApiClient, Result};

impl ApiClient {
    /// Notifications for the current user, optionally unread only.
    pub async fn notifications(&self, unread_only: bool) -> Result<Page<Notification>> {
        let mut builder = self
            .gateway()
            .request(reqwest::Method::GET, &self.url("notifications/"));
        if unread_only {
            builder = builder.query(&[("is_read", "false")]);
        }
        self.gateway().send_json(builder).await
    }

    /// Mark every notification read. Any 2xx body is ignored.
    pub async fn mark_all_read(&self) -> Result<()> {
        let builder = self
            .gateway()
            .request(reqwest::Method::POST, &self.url("notifications/mark-all-read/"))
            .json(&Map::new());
        self.gateway().send_empty(builder).await
    }
}
