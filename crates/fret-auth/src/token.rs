//! Access token payload inspection.
//!
//! The client never verifies signatures, it only peeks at the claims the
//! backend embeds (user, role, expiry) to make local decisions such as
//! skipping a request that is certain to 401. Any token that does not
//! decode yields `None`.

use chrono::Utc;
use fret_core::UserRole;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Claims carried by a fret access token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JwtPayload {
    /// Account ID.
    pub user_id: String,
    /// Login phone number.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Account role.
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issue time, seconds since the Unix epoch.
    #[serde(default)]
    pub iat: i64,
}

/// Decode the payload segment of `token` without verifying its signature.
pub fn decode_payload(token: &str) -> Option<JwtPayload> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    match decode::<JwtPayload>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            tracing::debug!("token payload not decodable: {e}");
            None
        }
    }
}

/// Whether `payload` has expired at `now` (seconds since the Unix epoch).
pub fn is_expired_at(payload: &JwtPayload, now: i64) -> bool {
    now > payload.exp
}

/// Whether `payload` has expired.
pub fn is_expired(payload: &JwtPayload) -> bool {
    is_expired_at(payload, Utc::now().timestamp())
}

/// Whether `token` is expired right now. Undecodable tokens count as expired.
pub fn token_expired(token: &str) -> bool {
    decode_payload(token).is_none_or(|p| is_expired(&p))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
