//! Account endpoints.

use fret_core::{Page, User, UserRole};
use serde::{Deserialize, Serialize};

use crate::{ApiClient, Result};

/// Filters for the user directory.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UserFilters {
    /// Only accounts with this role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    /// Only verified (or unverified) accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    /// Only active (or inactive) accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Free-text search over name and phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct Availability {
    is_available: bool,
}

impl ApiClient {
    /// `GET accounts/me/`.
    pub async fn me(&self) -> Result<User> {
        self.gateway().get_json(&self.url("accounts/me/")).await
    }

    /// `PATCH accounts/me/` with the changed fields. Returns the updated
    /// profile; the session's cached user is left to the caller.
    pub async fn update_me<B: Serialize + ?Sized>(&self, changes: &B) -> Result<User> {
        self.gateway().patch_json(&self.url("accounts/me/"), changes).await
    }

    /// `GET accounts/users/`.
    pub async fn users(&self, filters: &UserFilters) -> Result<Page<User>> {
        let builder = self
            .gateway()
            .request(reqwest::Method::GET, &self.url("accounts/users/"))
            .query(filters);
        self.gateway().send_json(builder).await
    }

    /// Toggle a driver's availability. Returns the server's resulting flag.
    #[tracing::instrument(skip(self))]
    pub async fn set_driver_availability(&self, available: bool) -> Result<bool> {
        let result: Availability = self
            .gateway()
            .post_json(
                &self.url("accounts/driver/availability/"),
                &Availability {
                    is_available: available,
                },
            )
            .await?;
        Ok(result.is_available)
    }
}
