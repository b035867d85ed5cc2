//! The notification value handed to the payload builder and frame encoder.

use bytes::Bytes;
use serde_json::Value;

use crate::alert::Alert;
use crate::errors::Result;
use crate::extra::{CustomData, ExtraPayload, not_a_mapping};
use crate::frame::encode_frame;
use crate::payload::{build_payload, payload_size, payload_text};
use crate::token::DeviceToken;

/// A single push notification.
///
/// Setters normalize on assignment: the device token is stripped, alerts
/// are classified as plain or structured, and custom data is checked to be
/// a mapping. Encoding never mutates the value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Notification {
    identifier: u32,
    device_token: DeviceToken,
    alert: Option<Alert>,
    badge: Option<u32>,
    sound: Option<String>,
    extra: ExtraPayload,
    expiry: u32,
}

impl Notification {
    /// Create a notification for `device_token` with every other field unset.
    pub fn new(device_token: &str) -> Self {
        Self {
            device_token: DeviceToken::new(device_token),
            ..Self::default()
        }
    }

    // ── accessors ───────────────────────────────────────────────────

    /// Correlation id echoed back by APNs in error responses.
    pub fn identifier(&self) -> u32 {
        self.identifier
    }

    /// Normalized device token.
    pub fn device_token(&self) -> &DeviceToken {
        &self.device_token
    }

    /// Alert, if any.
    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Whether the alert was supplied as structured JSON.
    pub fn alert_is_json(&self) -> bool {
        self.alert.as_ref().is_some_and(Alert::is_json)
    }

    /// Badge count.
    pub fn badge(&self) -> Option<u32> {
        self.badge
    }

    /// Sound file name.
    pub fn sound(&self) -> Option<&str> {
        self.sound.as_deref()
    }

    /// Custom data / MDM / content-available settings.
    pub fn extra(&self) -> &ExtraPayload {
        &self.extra
    }

    /// UNIX timestamp after which APNs drops the notification.
    pub fn expiry(&self) -> u32 {
        self.expiry
    }

    // ── setters ─────────────────────────────────────────────────────

    /// Set the correlation id.
    pub fn set_identifier(&mut self, identifier: u32) -> &mut Self {
        self.identifier = identifier;
        self
    }

    /// Set the device token, stripping spaces and angle brackets.
    pub fn set_device_token(&mut self, raw: &str) -> &mut Self {
        self.device_token = DeviceToken::new(raw);
        self
    }

    /// Set a plain-text or structured alert.
    pub fn set_alert(&mut self, alert: impl Into<Alert>) -> &mut Self {
        self.alert = Some(alert.into());
        self
    }

    /// Set the alert from an untyped JSON value; `null` clears it.
    pub fn set_alert_value(&mut self, value: Value) -> &mut Self {
        self.alert = Alert::from_value(value);
        self
    }

    /// Set or clear the badge.
    pub fn set_badge(&mut self, badge: Option<u32>) -> &mut Self {
        self.badge = badge;
        self
    }

    /// Set or clear the sound.
    pub fn set_sound(&mut self, sound: Option<String>) -> &mut Self {
        self.sound = sound;
        self
    }

    /// Set the expiry timestamp.
    pub fn set_expiry(&mut self, expiry: u32) -> &mut Self {
        self.expiry = expiry;
        self
    }

    /// Replace the custom data with `attrs`, which must be a JSON mapping.
    ///
    /// Every key is treated as app data; there are no reserved keys here.
    /// An existing content-available flag is kept, an MDM payload is
    /// replaced.
    ///
    /// Code ported from the flattened attribute-mapping model should note
    /// the difference: there, assigning the mapping dropped any
    /// content-available marker set earlier.
    pub fn set_attributes_for_device(&mut self, attrs: Value) -> Result<&mut Self> {
        match attrs {
            Value::Object(custom) => Ok(self.set_custom_data(custom)),
            other => Err(not_a_mapping(&other)),
        }
    }

    /// Replace the custom data with an already-typed mapping.
    pub fn set_custom_data(&mut self, custom: CustomData) -> &mut Self {
        let content_available = self.extra.content_available();
        self.extra = ExtraPayload::Standard {
            custom,
            content_available,
        };
        self
    }

    /// Turn this into an MDM notification carrying `magic`.
    ///
    /// Custom data and the content-available flag are discarded, as they
    /// were when the flattened mapping was replaced by the MDM marker.
    pub fn set_mdm(&mut self, magic: impl Into<Value>) -> &mut Self {
        self.extra = ExtraPayload::Mdm(magic.into());
        self
    }

    /// Mark the notification content-available. `false` does nothing.
    ///
    /// Existing custom data is kept. In the flattened attribute-mapping
    /// model this assignment replaced the whole mapping, discarding custom
    /// keys; call [`Self::set_custom_data`] with an empty map to get that.
    pub fn set_content_available(&mut self, enabled: bool) -> &mut Self {
        if !enabled {
            return self;
        }
        self.extra = match std::mem::take(&mut self.extra) {
            ExtraPayload::Standard { custom, .. } => ExtraPayload::Standard {
                custom,
                content_available: true,
            },
            ExtraPayload::Mdm(_) => ExtraPayload::Standard {
                custom: CustomData::new(),
                content_available: true,
            },
        };
        self
    }

    /// Replace the whole extra payload.
    pub fn set_extra(&mut self, extra: ExtraPayload) -> &mut Self {
        self.extra = extra;
        self
    }

    // ── encoding ────────────────────────────────────────────────────

    /// Ordered JSON document for this notification.
    pub fn build_payload(&self) -> Value {
        build_payload(self)
    }

    /// JSON text of [`Self::build_payload`].
    pub fn payload(&self) -> Result<String> {
        payload_text(self)
    }

    /// UTF-8 byte length of [`Self::payload`].
    pub fn payload_size(&self) -> Result<usize> {
        payload_size(self)
    }

    /// Enhanced-format binary frame.
    pub fn encode_frame(&self, for_validation: bool) -> Result<Bytes> {
        encode_frame(self, for_validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NotificationError;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn new_normalizes_token() {
        let n = Notification::new("<ab cd>");
        assert_eq!(n.device_token().as_str(), "abcd");
    }

    #[test]
    fn set_device_token_normalizes() {
        let mut n = Notification::default();
        let _ = n.set_device_token("  abc <> 123 ");
        assert_eq!(n.device_token().as_str(), "abc123");
    }

    #[test]
    fn alert_flag_tracks_variant() {
        let mut n = Notification::default();
        let _ = n.set_alert("hi");
        assert!(!n.alert_is_json());
        let _ = n.set_alert_value(json!({"body": "hi"}));
        assert!(n.alert_is_json());
        assert_eq!(n.alert().unwrap().to_json(), json!({"body": "hi"}));
        let _ = n.set_alert_value(Value::Null);
        assert!(n.alert().is_none());
        assert!(!n.alert_is_json());
    }

    #[test]
    fn attributes_must_be_mapping() {
        let mut n = Notification::default();
        assert_matches!(
            n.set_attributes_for_device(json!(["foo"])),
            Err(NotificationError::InvalidArgument(_))
        );
        // A rejected assignment leaves the previous value untouched.
        assert_eq!(n.extra(), &ExtraPayload::default());
    }

    #[test]
    fn attribute_keys_are_never_reserved() {
        let mut n = Notification::default();
        let _ = n
            .set_attributes_for_device(json!({crate::extra::MDM_KEY: "x"}))
            .unwrap();
        assert!(!n.extra().is_mdm());
        assert!(n.extra().custom().unwrap().contains_key(crate::extra::MDM_KEY));
    }

    #[test]
    fn content_available_false_is_noop() {
        let mut n = Notification::default();
        let _ = n.set_mdm("XYZ").set_content_available(false);
        assert_eq!(n.extra(), &ExtraPayload::Mdm(json!("XYZ")));
    }

    #[test]
    fn content_available_keeps_custom_data() {
        let mut n = Notification::default();
        let _ = n.set_attributes_for_device(json!({"foo": "bar"})).unwrap();
        let _ = n.set_content_available(true);
        assert!(n.extra().content_available());
        assert_eq!(n.extra().custom().unwrap()["foo"], "bar");

        // Replacing custom data keeps the flag.
        let _ = n.set_attributes_for_device(json!({"baz": 1})).unwrap();
        assert!(n.extra().content_available());
        assert!(!n.extra().custom().unwrap().contains_key("foo"));
    }

    #[test]
    fn clearing_custom_data_leaves_only_the_flag() {
        let mut n = Notification::default();
        let _ = n.set_attributes_for_device(json!({"foo": "bar"})).unwrap();
        let _ = n.set_custom_data(CustomData::new()).set_content_available(true);
        assert_eq!(
            n.extra(),
            &ExtraPayload::Standard {
                custom: CustomData::new(),
                content_available: true,
            }
        );
    }

    #[test]
    fn content_available_replaces_mdm() {
        let mut n = Notification::default();
        let _ = n.set_mdm("XYZ").set_content_available(true);
        assert!(!n.extra().is_mdm());
        assert!(n.extra().content_available());
    }

    #[test]
    fn mdm_replaces_custom_data() {
        let mut n = Notification::default();
        let _ = n.set_attributes_for_device(json!({"foo": "bar"})).unwrap();
        let _ = n.set_content_available(true).set_mdm(json!({"push_magic": "m"}));
        assert_eq!(n.extra(), &ExtraPayload::Mdm(json!({"push_magic": "m"})));
    }

    #[test]
    fn setters_chain() {
        let mut n = Notification::new("00");
        let _ = n
            .set_identifier(7)
            .set_expiry(1_700_000_000)
            .set_badge(Some(3))
            .set_sound(Some("ping.caf".into()));
        assert_eq!(n.identifier(), 7);
        assert_eq!(n.expiry(), 1_700_000_000);
        assert_eq!(n.badge(), Some(3));
        assert_eq!(n.sound(), Some("ping.caf"));
    }

    #[test]
    fn notification_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Notification>();
    }
}
