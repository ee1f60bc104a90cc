//! # fret-settings
//!
//! Configuration management with layered sources for the fret client.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`FretSettings::default()`]
//! 2. **User file**: `~/.fret/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `FRET_*` overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use fret_settings::get_settings;
//!
//! let settings = get_settings();
//! println!("API: {}", settings.api.base_url);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, apply_overrides, deep_merge, load_settings, load_settings_from_path,
    load_settings_with_env, settings_path,
};
pub use types::*;

use std::sync::OnceLock;

/// Global settings singleton.
///
/// Initialized on first access via [`get_settings`], or explicitly via
/// [`init_settings`] when a binary loads from a custom path.
static SETTINGS: OnceLock<FretSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.fret/settings.json` with env var
/// overrides. If loading fails, returns compiled defaults.
pub fn get_settings() -> &'static FretSettings {
    SETTINGS.get_or_init(|| {
        load_settings().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load settings, using defaults");
            FretSettings::default()
        })
    })
}

/// Initialize the global settings with a specific value.
///
/// # Errors
///
/// Returns the provided settings back if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: FretSettings) -> std::result::Result<(), FretSettings> {
    SETTINGS.set(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
