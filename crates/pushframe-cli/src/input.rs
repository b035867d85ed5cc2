//! JSON input accepted by the CLI and its conversion into a [`Notification`].

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use pushframe_apns::Notification;
use pushframe_settings::NotificationSettings;
use serde::Deserialize;
use serde_json::Value;

/// A notification as written by hand or by another tool.
///
/// ```json
/// {
///   "deviceToken": "<740f4707 bebcf74f ...>",
///   "alert": {"body": "hi"},
///   "badge": 1,
///   "attributesForDevice": {"thread": "t1"},
///   "contentAvailable": true
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NotificationInput {
    /// Device token, spaces and angle brackets allowed.
    pub device_token: String,
    /// Plain string or structured alert mapping.
    pub alert: Option<Value>,
    /// Badge count.
    pub badge: Option<u32>,
    /// Sound file name; falls back to `notification.defaultSound`.
    pub sound: Option<String>,
    /// Custom data mapping.
    pub attributes_for_device: Option<Value>,
    /// MDM push magic. Takes precedence over everything else.
    pub mdm: Option<Value>,
    /// Background delivery flag.
    #[serde(default)]
    pub content_available: bool,
    /// Expiry timestamp; falls back to now + `notification.defaultExpirySecs`.
    pub expiry: Option<u32>,
    /// Correlation id.
    #[serde(default)]
    pub identifier: u32,
}

impl NotificationInput {
    /// Parse input JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("input is not a valid notification document")
    }

    /// Build the notification, filling gaps from `defaults`.
    pub fn into_notification(
        self,
        defaults: &NotificationSettings,
        now: DateTime<Utc>,
    ) -> Result<Notification> {
        let expiry = match self.expiry {
            Some(expiry) => expiry,
            None => default_expiry(now, defaults.default_expiry_secs)?,
        };

        let mut notification = Notification::new(&self.device_token);
        let _ = notification
            .set_identifier(self.identifier)
            .set_expiry(expiry)
            .set_badge(self.badge)
            .set_sound(self.sound.or_else(|| defaults.default_sound.clone()));

        if let Some(alert) = self.alert {
            let _ = notification.set_alert_value(alert);
        }
        if let Some(attrs) = self.attributes_for_device {
            let _ = notification
                .set_attributes_for_device(attrs)
                .context("attributesForDevice")?;
        }
        let _ = notification.set_content_available(self.content_available);
        if let Some(magic) = self.mdm {
            let _ = notification.set_mdm(magic);
        }

        Ok(notification)
    }
}

fn default_expiry(now: DateTime<Utc>, secs: u32) -> Result<u32> {
    let at = now.timestamp() + i64::from(secs);
    u32::try_from(at).with_context(|| format!("default expiry {at} does not fit in 32 bits"))
}
