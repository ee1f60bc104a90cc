//! Tracking endpoints.

use fret_core::tracking::{DriverLocation, NearbyQuery};

use crate::{ApiClient, Result};

impl ApiClient {
    /// Drivers available around a point. Unset query fields are omitted and
    /// the server applies its own defaults.
    pub async fn available_drivers(&self, near: &NearbyQuery) -> Result<Vec<DriverLocation>> {
        let builder = self
            .gateway()
            .request(reqwest::Method::GET, &self.url("tracking/available-drivers/"))
            .query(&near.to_query());
        self.gateway().send_json(builder).await
    }
}
