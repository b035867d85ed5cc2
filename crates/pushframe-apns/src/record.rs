//! Flat storage form of a notification.
//!
//! Alert and custom data travel as JSON text columns. Records written before
//! the alert flag column existed have `alert_is_json: None`; their alerts are
//! decoded opportunistically (see [`Alert::from_stored`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::alert::Alert;
use crate::errors::Result;
use crate::extra::ExtraPayload;
use crate::notification::Notification;

/// A notification as persisted by a notification store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Correlation id.
    pub id: u32,
    /// Device token text, possibly un-normalized.
    pub device_token: String,
    /// Alert text; JSON text when `alert_is_json` is set.
    #[serde(default)]
    pub alert: Option<String>,
    /// Alert flag column, absent in legacy records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_is_json: Option<bool>,
    /// Badge count.
    #[serde(default)]
    pub badge: Option<u32>,
    /// Sound file name.
    #[serde(default)]
    pub sound: Option<String>,
    /// JSON text of the flattened attribute mapping, reserved keys included.
    #[serde(default)]
    pub attributes_for_device: Option<String>,
    /// Expiry timestamp.
    #[serde(default)]
    pub expiry: u32,
}

impl Notification {
    /// Rebuild a notification from its stored record.
    pub fn from_record(record: &NotificationRecord) -> Result<Self> {
        let mut notification = Self::new(&record.device_token);
        let _ = notification
            .set_identifier(record.id)
            .set_badge(record.badge)
            .set_sound(record.sound.clone())
            .set_expiry(record.expiry);

        if let Some(text) = &record.alert {
            let _ = notification.set_alert(Alert::from_stored(text, record.alert_is_json)?);
        }

        if let Some(text) = record.attributes_for_device.as_deref() {
            if !text.trim().is_empty() {
                let attrs: Value = serde_json::from_str(text)?;
                let _ = notification.set_extra(ExtraPayload::from_attributes(attrs)?);
            }
        }

        Ok(notification)
    }

    /// Flatten into a record in the current schema.
    ///
    /// The alert flag column is always written, `false` when there is no
    /// alert.
    pub fn to_record(&self) -> Result<NotificationRecord> {
        let (alert, alert_is_json) = match self.alert() {
            Some(alert) => {
                let stored = alert.to_stored()?;
                (Some(stored.text), stored.is_json)
            }
            None => (None, false),
        };

        let attributes_for_device = self
            .extra()
            .to_attributes()
            .map(|attrs| serde_json::to_string(&attrs))
            .transpose()?;

        Ok(NotificationRecord {
            id: self.identifier(),
            device_token: self.device_token().as_str().to_owned(),
            alert,
            alert_is_json: Some(alert_is_json),
            badge: self.badge(),
            sound: self.sound().map(str::to_owned),
            attributes_for_device,
            expiry: self.expiry(),
        })
    }
}
