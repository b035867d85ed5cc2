//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so a settings file may contain any subset of fields.

use serde::{Deserialize, Serialize};

/// Root settings type.
///
/// ```json
/// {
///   "logging": { "level": "debug" },
///   "notification": { "defaultExpirySecs": 3600 }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PushframeSettings {
    /// Log output configuration.
    pub logging: LoggingSettings,
    /// Defaults applied to notifications that omit a field.
    pub notification: NotificationSettings,
    /// Frame encoding thresholds.
    pub frame: FrameSettings,
}

/// Log output configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level (or `EnvFilter` directive). `RUST_LOG` still wins.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Defaults applied to notifications that omit a field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    /// Seconds from now used as `expiry` when a notification has none.
    pub default_expiry_secs: u32,
    /// Sound used when a notification has none.
    pub default_sound: Option<String>,
}

/// One day, the expiry the legacy gateway clients used by default.
pub const DEFAULT_EXPIRY_SECS: u32 = 86_400;

/// Upper bound accepted for `defaultExpirySecs` from the environment.
pub const MAX_EXPIRY_SECS: u32 = 31_536_000;

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            default_expiry_secs: DEFAULT_EXPIRY_SECS,
            default_sound: None,
        }
    }
}

/// Frame encoding thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameSettings {
    /// Payloads above this many bytes are logged as oversized.
    pub warn_payload_bytes: usize,
}

/// Maximum payload size the legacy binary gateway accepted.
pub const LEGACY_MAX_PAYLOAD_BYTES: usize = 256;

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            warn_payload_bytes: LEGACY_MAX_PAYLOAD_BYTES,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
