//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so a settings file may contain any subset of fields; missing fields keep
//! their production default.

mod api;
mod logging;
mod realtime;

pub use api::*;
pub use logging::*;
pub use realtime::*;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type for the fret client.
///
/// ```json
/// {
///   "api": { "baseUrl": "https://mess.example.sn/api/v1" },
///   "realtime": { "wsUrl": "wss://mess.example.sn/ws" },
///   "auth": { "coalesceRefresh": true }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FretSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// REST API settings.
    pub api: ApiSettings,
    /// Session and token persistence settings.
    pub auth: AuthSettings,
    /// WebSocket channel settings.
    pub realtime: RealtimeSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for FretSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: fret_core::constants::NAME.to_string(),
            api: ApiSettings::default(),
            auth: AuthSettings::default(),
            realtime: RealtimeSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl FretSettings {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        check_url("api.baseUrl", &self.api.base_url, &["http://", "https://"])?;
        check_url("realtime.wsUrl", &self.realtime.ws_url, &["ws://", "wss://"])?;
        for (name, template) in self.realtime.templates.entries() {
            if !template.contains(ChannelTemplates::ID_PLACEHOLDER) {
                return Err(SettingsError::InvalidValue(format!(
                    "realtime.templates.{name} must contain {}",
                    ChannelTemplates::ID_PLACEHOLDER
                )));
            }
        }
        if self.realtime.channel_capacity == 0 {
            return Err(SettingsError::InvalidValue(
                "realtime.channelCapacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_url(field: &str, value: &str, schemes: &[&str]) -> Result<()> {
    if schemes.iter().any(|s| value.starts_with(s)) {
        Ok(())
    } else {
        Err(SettingsError::InvalidValue(format!(
            "{field} must start with one of {schemes:?}, got {value:?}"
        )))
    }
}
