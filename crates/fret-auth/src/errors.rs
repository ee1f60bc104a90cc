//! Auth and gateway error types.

/// Errors from session operations (login, refresh, token persistence).
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// HTTP request failed before a response arrived, or the body could not
    /// be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Token file I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server refused the submitted credentials.
    #[error("invalid credentials ({status}): {message}")]
    InvalidCredentials {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// A refresh was requested but no refresh token is stored.
    #[error("no refresh token stored")]
    NoRefreshToken,

    /// An auth endpoint answered with a non-success status.
    #[error("auth endpoint rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The session was cleared while a refresh was in flight.
    #[error("session ended while refreshing")]
    SessionEnded,
}

impl AuthError {
    /// HTTP status carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidCredentials { status, .. } | Self::Rejected { status, .. } => {
                Some(*status)
            }
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Errors from requests sent through the [`RequestGateway`](crate::RequestGateway).
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Network-level failure (connect, DNS, timeout, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The access token expired and could not be refreshed; the session was
    /// ended.
    #[error("session refresh failed: {0}")]
    Refresh(#[source] AuthError),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The access token cannot be carried in an HTTP header.
    #[error("access token is not a valid header value")]
    InvalidHeader,
}

impl GatewayError {
    /// HTTP status carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Refresh(e) => e.status(),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::InvalidHeader => None,
        }
    }

    /// Whether the session was ended by this failure.
    pub fn ended_session(&self) -> bool {
        matches!(self, Self::Refresh(_))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
