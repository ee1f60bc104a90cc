//! # fret-core
//!
//! Shared vocabulary for the fret marketplace client.
//!
//! - **Accounts**: [`User`], [`UserRole`] and the per-role profiles
//! - **Orders**: freight orders, bids, assignments and their status enums
//! - **Tracking / messaging / notifications**: REST resource models
//! - **Realtime**: payloads carried on the tracking and chat channels
//! - **Pagination**: the [`Page`] envelope returned by list endpoints
//! - **Logging**: [`logging::init_subscriber`] for binaries

#![deny(unsafe_code)]

pub mod constants;
mod decimal;
pub mod logging;
pub mod messaging;
pub mod notifications;
pub mod orders;
pub mod pagination;
pub mod realtime;
pub mod tracking;
pub mod user;

pub use pagination::Page;
pub use user::{BrokerProfile, DriverProfile, ShipperProfile, User, UserRole};
