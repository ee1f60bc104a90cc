//! Account models.
//!
//! A [`User`] is what `GET accounts/me/` returns and what login embeds next
//! to the token pair. Only `id` and `role` are required; every other field
//! defaults so partial payloads still decode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decimal::{f64_lenient, opt_f64_lenient};

/// Marketplace role of an account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Posts cargo orders.
    Shipper,
    /// Bids on and carries orders.
    Driver,
    /// Intermediates between shippers and drivers.
    Broker,
    /// Manages a fleet of vehicles and drivers.
    FleetManager,
    /// Platform administrator.
    Admin,
}

impl UserRole {
    /// All roles, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Shipper,
        Self::Driver,
        Self::Broker,
        Self::FleetManager,
        Self::Admin,
    ];

    /// Wire name (`"FLEET_MANAGER"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shipper => "SHIPPER",
            Self::Driver => "DRIVER",
            Self::Broker => "BROKER",
            Self::FleetManager => "FLEET_MANAGER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == upper)
            .ok_or_else(|| format!("unknown role: {s}"))
    }
}

/// An authenticated marketplace account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account ID (UUID).
    pub id: String,
    /// Phone number used as the login identifier.
    #[serde(default)]
    pub phone_number: String,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Marketplace role.
    pub role: UserRole,
    /// Whether the phone number was verified by OTP.
    #[serde(default)]
    pub is_verified: bool,
    /// Whether the account is active.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// ISO-8601 registration timestamp.
    #[serde(default)]
    pub date_joined: String,
    /// Present for drivers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_profile: Option<DriverProfile>,
    /// Present for shippers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipper_profile: Option<ShipperProfile>,
    /// Present for brokers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_profile: Option<BrokerProfile>,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Whether this account holds any of `roles`.
    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        roles.contains(&self.role)
    }
}

/// Driver-specific profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverProfile {
    /// Profile ID.
    pub id: String,
    /// Driving license number.
    pub license_number: String,
    /// Driving license class.
    pub license_class: String,
    /// Whether the driver accepts new jobs.
    pub is_available: bool,
    /// Last reported latitude.
    #[serde(deserialize_with = "opt_f64_lenient")]
    pub current_latitude: Option<f64>,
    /// Last reported longitude.
    #[serde(deserialize_with = "opt_f64_lenient")]
    pub current_longitude: Option<f64>,
    /// Average rating.
    #[serde(deserialize_with = "f64_lenient")]
    pub rating_avg: f64,
    /// Number of ratings received.
    pub rating_count: u32,
    /// Completed trips.
    pub total_trips: u32,
}

/// Shipper-specific profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipperProfile {
    /// Profile ID.
    pub id: String,
    /// Company name.
    pub company_name: String,
    /// Company registration number.
    pub siret: String,
    /// Business address.
    pub business_address: String,
}

/// Broker-specific profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerProfile {
    /// Profile ID.
    pub id: String,
    /// Company name.
    pub company_name: String,
    /// Commission rate (fraction).
    #[serde(deserialize_with = "f64_lenient")]
    pub commission_rate: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_wire_names() {
        assert_eq!(
            serde_json::to_value(UserRole::FleetManager).unwrap(),
            json!("FLEET_MANAGER")
        );
        let r: UserRole = serde_json::from_value(json!("DRIVER")).unwrap();
        assert_eq!(r, UserRole::Driver);
    }

    #[test]
    fn role_from_str_is_lenient() {
        assert_eq!("shipper".parse::<UserRole>().unwrap(), UserRole::Shipper);
        assert_eq!(
            "fleet-manager".parse::<UserRole>().unwrap(),
            UserRole::FleetManager
        );
        assert!("pilot".parse::<UserRole>().is_err());
    }

    #[test]
    fn minimal_user_decodes() {
        let user: User = serde_json::from_value(json!({"id": "u1", "role": "SHIPPER"})).unwrap();
        assert_eq!(user.id, "u1");
        assert!(user.is_active);
        assert!(!user.is_verified);
        assert!(user.driver_profile.is_none());
    }

    #[test]
    fn driver_profile_accepts_decimal_strings() {
        let user: User = serde_json::from_value(json!({
            "id": "u2",
            "role": "DRIVER",
            "phone_number": "+221700000001",
            "driver_profile": {
                "id": "p1",
                "license_number": "SN-123",
                "is_available": true,
                "current_latitude": "14.6928",
                "current_longitude": null,
                "rating_avg": "4.50",
                "rating_count": 12,
                "total_trips": 40
            }
        }))
        .unwrap();
        let profile = user.driver_profile.unwrap();
        assert_eq!(profile.current_latitude, Some(14.6928));
        assert!(profile.current_longitude.is_none());
        assert!((profile.rating_avg - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn has_any_role() {
        let user: User = serde_json::from_value(json!({"id": "u1", "role": "BROKER"})).unwrap();
        assert!(user.has_any_role(&[UserRole::Admin, UserRole::Broker]));
        assert!(!user.has_any_role(&[UserRole::Driver]));
        assert!(!user.has_any_role(&[]));
    }

    #[test]
    fn unknown_fields_ignored() {
        let user: User = serde_json::from_value(json!({
            "id": "u1", "role": "ADMIN", "preferred_language": "wo"
        }))
        .unwrap();
        assert_eq!(user.role, UserRole::Admin);
    }
}
