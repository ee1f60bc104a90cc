//! Package-level constants.

/// Current version of the fret client (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name.
pub const NAME: &str = "fret";

/// Storage key of the persisted access token.
pub const ACCESS_TOKEN_KEY: &str = "fret_access";

/// Storage key of the persisted refresh token.
pub const REFRESH_TOKEN_KEY: &str = "fret_refresh";
