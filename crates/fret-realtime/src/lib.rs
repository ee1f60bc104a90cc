//! # fret-realtime
//!
//! Keyed WebSocket channels for live order tracking, order updates and
//! chat.
//!
//! - [`ChannelHub`]: registry holding at most one socket per
//!   `(ChannelType, id)`, shared by all subscribers of that key.
//! - [`ChannelSubscription`]: a subscriber's event stream.
//! - [`ChannelEvent`]: JSON message or terminal failure, with typed
//!   decoding into the payloads of `fret_core::realtime`.

#![deny(unsafe_code)]

pub mod channel;
pub mod errors;
pub mod hub;
pub mod types;
pub mod url;

pub use channel::ChannelSubscription;
pub use errors::ChannelError;
pub use hub::{ChannelHub, StaticToken, TokenSource};
pub use types::{ChannelEvent, ChannelKey, ChannelType};
