//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`PushframeSettings::default()`]
//! 2. If `~/.pushframe/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `PUSHFRAME_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::{MAX_EXPIRY_SECS, PushframeSettings};

/// Env var overriding `logging.level`.
pub const ENV_LOG_LEVEL: &str = "PUSHFRAME_LOG_LEVEL";
/// Env var overriding `notification.defaultExpirySecs`.
pub const ENV_DEFAULT_EXPIRY_SECS: &str = "PUSHFRAME_DEFAULT_EXPIRY_SECS";
/// Env var overriding `notification.defaultSound`.
pub const ENV_DEFAULT_SOUND: &str = "PUSHFRAME_DEFAULT_SOUND";
/// Env var overriding `frame.warnPayloadBytes`.
pub const ENV_WARN_PAYLOAD_BYTES: &str = "PUSHFRAME_WARN_PAYLOAD_BYTES";

/// Resolve the path to the settings file (`~/.pushframe/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".pushframe").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<PushframeSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<PushframeSettings> {
    let mut settings = load_file_layer(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Defaults merged with the file at `path`, without env overrides.
fn load_file_layer(path: &Path) -> Result<PushframeSettings> {
    let defaults = serde_json::to_value(PushframeSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply process environment overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut PushframeSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// Empty values are treated as unset. Values that fail to parse or fall
/// outside their range are ignored with a warning.
pub fn apply_overrides<F>(settings: &mut PushframeSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read(ENV_LOG_LEVEL) {
        settings.logging.level = v;
    }
    if let Some(raw) = read(ENV_DEFAULT_EXPIRY_SECS) {
        match parse_u32_range(&raw, 0, MAX_EXPIRY_SECS) {
            Some(v) => settings.notification.default_expiry_secs = v,
            None => warn!(key = ENV_DEFAULT_EXPIRY_SECS, value = %raw, "invalid u32 env var, ignoring"),
        }
    }
    if let Some(v) = read(ENV_DEFAULT_SOUND) {
        settings.notification.default_sound = Some(v);
    }
    if let Some(raw) = read(ENV_WARN_PAYLOAD_BYTES) {
        match parse_usize_range(&raw, 1, usize::from(u16::MAX)) {
            Some(v) => settings.frame.warn_payload_bytes = v,
            None => warn!(key = ENV_WARN_PAYLOAD_BYTES, value = %raw, "invalid usize env var, ignoring"),
        }
    }
}

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
