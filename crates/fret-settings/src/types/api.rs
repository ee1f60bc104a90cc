//! REST API and session settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// REST API settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Base URL every endpoint path is joined to (no trailing slash needed).
    pub base_url: String,
    /// Optional whole-request timeout applied by the HTTP client.
    ///
    /// `None` leaves timeouts to the network stack.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1".to_string(),
            request_timeout_ms: None,
        }
    }
}

/// Session and token persistence settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthSettings {
    /// Token file location. Defaults to `~/.fret/tokens.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<String>,
    /// Share one in-flight refresh between concurrent 401 responses.
    pub coalesce_refresh: bool,
}

impl AuthSettings {
    /// Resolve the token file path.
    pub fn token_file_path(&self) -> PathBuf {
        self.token_file.as_ref().map_or_else(
            || {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".fret").join("tokens.json")
            },
            PathBuf::from,
        )
    }
}
