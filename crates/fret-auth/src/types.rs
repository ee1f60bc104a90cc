//! Auth endpoint request and response bodies.

use fret_core::{User, UserRole};
use serde::{Deserialize, Serialize};

/// Successful login: a token pair plus the account it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthResult {
    /// Access token.
    pub access: String,
    /// Refresh token.
    pub refresh: String,
    /// Authenticated account.
    pub user: User,
}

/// Successful refresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRefresh {
    /// New access token.
    pub access: String,
}

/// Account registration form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Login phone number.
    pub phone_number: String,
    /// Display name.
    pub full_name: String,
    /// Requested role.
    pub role: UserRole,
    /// Password.
    pub password: String,
    /// Password confirmation.
    pub password_confirm: String,
    /// Optional contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Registration acknowledgement. An OTP is sent to the phone number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Created account ID.
    #[serde(default)]
    pub user_id: String,
    /// Human-readable next step.
    #[serde(default)]
    pub message: String,
}

/// Generic `{"message": "..."}` acknowledgement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    #[serde(default)]
    pub message: String,
}
