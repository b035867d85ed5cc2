//! # pushframe-settings
//!
//! Configuration management with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`PushframeSettings::default()`]
//! 2. **User file**: `~/.pushframe/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `PUSHFRAME_*` overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use pushframe_settings::get_settings;
//!
//! let settings = get_settings();
//! println!("default expiry: {}s", settings.notification.default_expiry_secs);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::sync::OnceLock;

/// Global settings singleton, initialized on first access.
static SETTINGS: OnceLock<PushframeSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.pushframe/settings.json` with env
/// var overrides. If loading fails, returns compiled defaults.
pub fn get_settings() -> &'static PushframeSettings {
    SETTINGS.get_or_init(|| match load_settings() {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load settings, using defaults");
            PushframeSettings::default()
        }
    })
}

/// Initialize the global settings with a specific value.
///
/// Returns `Err(settings)` if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: PushframeSettings) -> std::result::Result<(), PushframeSettings> {
    SETTINGS.set(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
