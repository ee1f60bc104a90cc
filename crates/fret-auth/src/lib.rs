//! # fret-auth
//!
//! Authentication state and authenticated HTTP for the fret client.
//!
//! - [`SessionManager`]: the single owner of the token pair and the current
//!   user. Restores a persisted session at startup, logs in, refreshes the
//!   access token and logs out.
//! - [`RequestGateway`]: middleware stage in front of `reqwest` that attaches
//!   the bearer token and recovers from one expired-token 401 by refreshing
//!   and replaying the request exactly once.
//! - [`storage`]: where the token pair lives between runs.
//! - [`token`]: unverified JWT payload inspection.
//! - [`guard`]: route access decisions derived from the session.
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> Result<(), fret_auth::AuthError> {
//! use fret_auth::SessionManager;
//!
//! let session = SessionManager::from_settings(fret_settings::get_settings())?;
//! if session.initialize().await.is_none() {
//!     let _ = session.login("+221700000000", "secret").await?;
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod endpoints;
pub mod errors;
pub mod gateway;
pub mod guard;
pub mod navigation;
pub mod session;
pub mod storage;
pub mod token;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use endpoints::AuthEndpoints;
pub use errors::{AuthError, GatewayError};
pub use gateway::RequestGateway;
pub use guard::Access;
pub use navigation::{LogNavigator, Navigator, Route};
pub use session::{SessionConfig, SessionManager};
pub use storage::{FileTokenStore, MemoryTokenStore, StoredTokens, TokenStore};
pub use token::{JwtPayload, decode_payload, is_expired, token_expired};
pub use types::{AuthResult, MessageResponse, RegisterRequest, RegisterResponse, TokenRefresh};
