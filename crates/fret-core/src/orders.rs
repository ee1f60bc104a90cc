//! Freight orders, bids and assignments.

use serde::{Deserialize, Serialize};

use crate::decimal::{f64_lenient, opt_f64_lenient};

/// Lifecycle status of a freight order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum OrderStatus {
    Draft,
    Posted,
    Bidding,
    Assigned,
    PickupPending,
    PickedUp,
    InTransit,
    Delivered,
    Completed,
    Cancelled,
    Disputed,
}

impl OrderStatus {
    /// Whether the order has reached a final state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether a driver is on the road with the cargo (live tracking makes sense).
    pub fn is_trackable(self) -> bool {
        matches!(
            self,
            Self::PickupPending | Self::PickedUp | Self::InTransit
        )
    }
}

/// Kind of cargo carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum CargoType {
    General,
    Refrigerated,
    Hazmat,
    Livestock,
    Bulk,
    Container,
    Oversize,
}

/// A freight order as listed and fetched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FreightOrder {
    /// Order ID.
    pub id: String,
    /// Human-readable reference.
    #[serde(default)]
    pub reference: String,
    /// Current status.
    pub status: OrderStatus,
    /// Shipper account ID.
    #[serde(default)]
    pub shipper: String,
    /// Shipper display name.
    #[serde(default)]
    pub shipper_name: String,
    /// Cargo kind.
    pub cargo_type: CargoType,
    /// Free-text cargo description.
    #[serde(default)]
    pub cargo_description: String,
    /// Weight in kilograms.
    #[serde(deserialize_with = "f64_lenient")]
    pub weight_kg: f64,
    /// Volume in cubic meters.
    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub volume_m3: Option<f64>,
    /// Pickup address.
    #[serde(default)]
    pub pickup_address: String,
    /// Pickup city.
    #[serde(default)]
    pub pickup_city: String,
    /// Delivery address.
    #[serde(default)]
    pub delivery_address: String,
    /// Delivery city.
    #[serde(default)]
    pub delivery_city: String,
    /// ISO-8601 pickup date.
    #[serde(default)]
    pub pickup_date: String,
    /// ISO-8601 delivery deadline.
    #[serde(default)]
    pub delivery_deadline: Option<String>,
    /// Shipper's budget in XOF.
    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub budget_xof: Option<f64>,
    /// Agreed price in XOF once assigned.
    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub final_price_xof: Option<f64>,
    /// Shipper notes.
    #[serde(default)]
    pub notes: String,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: String,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: String,
    /// Assignment, once a bid was accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment: Option<OrderAssignment>,
    /// Number of pending bids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_bid_count: Option<u32>,
}

/// Status of a driver's bid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum BidStatus {
    Pending,
    Accepted,
    Rejected,
}

/// A driver's price offer on an order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderBid {
    /// Bid ID.
    pub id: String,
    /// Order ID.
    pub order: String,
    /// Driver account ID.
    pub driver: String,
    /// Driver display name.
    #[serde(default)]
    pub driver_name: String,
    /// Offered amount in XOF.
    #[serde(deserialize_with = "f64_lenient")]
    pub amount_xof: f64,
    /// Proposed pickup time.
    #[serde(default)]
    pub estimated_pickup: Option<String>,
    /// Message to the shipper.
    #[serde(default)]
    pub message: String,
    /// Bid status.
    pub status: BidStatus,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: String,
}

/// The driver assignment produced by accepting a bid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderAssignment {
    /// Assignment ID.
    pub id: String,
    /// Order ID.
    pub order: String,
    /// Driver account ID.
    pub driver: String,
    /// Driver display name.
    #[serde(default)]
    pub driver_name: String,
    /// Vehicle ID, if one was chosen.
    #[serde(default)]
    pub vehicle: Option<String>,
    /// Accepted bid ID.
    #[serde(default)]
    pub bid: Option<String>,
    /// Agreed price in XOF.
    #[serde(deserialize_with = "f64_lenient")]
    pub agreed_price_xof: f64,
    /// Assignment timestamp.
    #[serde(default)]
    pub assigned_at: String,
    /// Rating given by the shipper.
    #[serde(default)]
    pub shipper_rating: Option<u8>,
}

/// Payload for creating or patching an order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Cargo kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_type: Option<CargoType>,
    /// Cargo description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_description: Option<String>,
    /// Weight in kilograms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Volume in cubic meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_m3: Option<f64>,
    /// Pickup address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_address: Option<String>,
    /// Pickup city.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_city: Option<String>,
    /// Pickup latitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_latitude: Option<f64>,
    /// Pickup longitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_longitude: Option<f64>,
    /// Delivery address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    /// Delivery city.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_city: Option<String>,
    /// Delivery latitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_latitude: Option<f64>,
    /// Delivery longitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_longitude: Option<f64>,
    /// ISO-8601 pickup date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_date: Option<String>,
    /// ISO-8601 delivery deadline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_deadline: Option<String>,
    /// Budget in XOF.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_xof: Option<f64>,
    /// Notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for submitting a bid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BidDraft {
    /// Offered amount in XOF.
    pub amount_xof: f64,
    /// Message to the shipper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Proposed pickup time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_pickup: Option<String>,
}
