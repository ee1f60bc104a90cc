//! Driver location models.

use serde::{Deserialize, Serialize};

use crate::decimal::{f64_lenient, opt_f64_lenient};

/// Last known position of a driver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriverLocation {
    /// Driver account ID.
    pub driver_id: String,
    /// Driver display name.
    #[serde(default)]
    pub driver_name: String,
    /// Latitude in degrees.
    #[serde(deserialize_with = "f64_lenient")]
    pub latitude: f64,
    /// Longitude in degrees.
    #[serde(deserialize_with = "f64_lenient")]
    pub longitude: f64,
    /// Speed in km/h.
    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub speed_kmh: Option<f64>,
    /// Heading in degrees.
    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub heading: Option<f64>,
    /// Position accuracy in meters.
    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub accuracy_m: Option<f64>,
    /// ISO-8601 fix timestamp.
    #[serde(default)]
    pub timestamp: String,
    /// Order being carried, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Whether the driver accepts new jobs.
    #[serde(default)]
    pub is_available: bool,
}

/// Search area for the available-drivers endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NearbyQuery {
    /// Center latitude.
    pub lat: Option<f64>,
    /// Center longitude.
    pub lng: Option<f64>,
    /// Search radius in kilometers.
    pub radius_km: Option<f64>,
}

impl NearbyQuery {
    /// Query-string pairs for the set fields, in a stable order.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        [("lat", self.lat), ("lng", self.lng), ("radius_km", self.radius_km)]
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v.to_string())))
            .collect()
    }
}
