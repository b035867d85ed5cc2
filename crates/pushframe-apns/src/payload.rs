//! JSON payload builder.
//!
//! Produces either an MDM payload (`{"mdm": ...}`) or an `aps` payload:
//!
//! ```text
//! {"aps": {"alert": ..., "badge": ..., "sound": ..., "content-available": 1}, <custom keys>}
//! ```
//!
//! Key order inside `aps` is fixed. `serde_json` is built with
//! `preserve_order`, so the map keeps insertion order through encoding.

use serde_json::{Map, Value};

use crate::errors::Result;
use crate::extra::{ExtraPayload, value_to_text};
use crate::notification::Notification;

/// Top-level key of the standard dictionary.
pub const APS_KEY: &str = "aps";
/// Top-level key of an MDM payload.
pub const MDM_PAYLOAD_KEY: &str = "mdm";

/// Build the ordered JSON document for `notification`.
pub fn build_payload(notification: &Notification) -> Value {
    let mut root = Map::new();

    let (custom, content_available) = match notification.extra() {
        ExtraPayload::Mdm(magic) => {
            let _ = root.insert(MDM_PAYLOAD_KEY.to_owned(), magic.clone());
            return Value::Object(root);
        }
        ExtraPayload::Standard {
            custom,
            content_available,
        } => (custom, *content_available),
    };

    let mut aps = Map::new();
    if let Some(alert) = notification.alert().filter(|a| !a.is_empty()) {
        let _ = aps.insert("alert".to_owned(), alert.to_json());
    }
    if let Some(badge) = notification.badge() {
        let _ = aps.insert("badge".to_owned(), Value::from(badge));
    }
    if let Some(sound) = notification.sound() {
        let _ = aps.insert("sound".to_owned(), Value::from(sound));
    }
    if content_available {
        let _ = aps.insert("content-available".to_owned(), Value::from(1));
    }
    let _ = root.insert(APS_KEY.to_owned(), Value::Object(aps));

    // A custom "aps" key replaces the dictionary in place.
    for (key, value) in custom {
        let _ = root.insert(key.clone(), Value::String(value_to_text(value)));
    }

    Value::Object(root)
}

/// Encode the payload of `notification` as compact JSON text.
pub fn payload_text(notification: &Notification) -> Result<String> {
    Ok(serde_json::to_string(&build_payload(notification))?)
}

/// Size in bytes of the UTF-8 payload text (not its character count).
pub fn payload_size(notification: &Notification) -> Result<usize> {
    Ok(payload_text(notification)?.len())
}
