//! # fret-api
//!
//! Typed REST client for the marketplace API. Every call goes through the
//! session's [`RequestGateway`](fret_auth::RequestGateway), so bearer
//! authentication and the one-shot refresh on 401 apply uniformly.
//!
//! Endpoints are grouped by resource in `impl ApiClient` blocks:
//! accounts, orders and bids, tracking, messaging, notifications.

#![deny(unsafe_code)]

mod accounts;
mod client;
mod messaging;
mod notifications;
mod orders;
mod tracking;

#[cfg(test)]
pub(crate) mod test_support;

pub use accounts::UserFilters;
pub use client::ApiClient;
pub use orders::{CANCEL_TRANSITION, OrderFilters};

/// Errors from API calls. Same taxonomy as the gateway.
pub use fret_auth::GatewayError as ApiError;

/// Result alias for API calls.
pub type Result<T> = std::result::Result<T, ApiError>;
