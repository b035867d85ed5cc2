//! Alert content: plain text or a structured (localized / rich) mapping.
//!
//! Storage keeps an alert as text plus an "is JSON" flag. Here the flag is
//! the variant itself, so the text and the flag can never disagree.

use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::{NotificationError, Result};

/// The user-visible alert of a notification.
#[derive(Clone, Debug, PartialEq)]
pub enum Alert {
    /// A plain string shown as the alert body.
    PlainText(String),
    /// A decoded JSON value, normally a mapping such as
    /// `{"body": "...", "loc-key": "...", "loc-args": [...]}`.
    Structured(Value),
}

/// Text form of an alert as persisted next to its "is JSON" flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredAlert {
    /// Plain text, or JSON text when `is_json` is set.
    pub text: String,
    /// Whether `text` must be JSON-decoded on read.
    pub is_json: bool,
}

impl Alert {
    /// Classify an arbitrary JSON value the way an alert assignment does.
    ///
    /// Mappings become [`Alert::Structured`], strings [`Alert::PlainText`],
    /// `null` clears the alert, and any other scalar is kept as its text.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Self::PlainText(s)),
            obj @ Value::Object(_) => Some(Self::Structured(obj)),
            other => Some(Self::PlainText(other.to_string())),
        }
    }

    /// Whether this alert was supplied as structured JSON.
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// Whether the alert carries nothing worth sending.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::PlainText(s) => s.is_empty(),
            Self::Structured(Value::Null) => true,
            Self::Structured(Value::Object(map)) => map.is_empty(),
            Self::Structured(_) => false,
        }
    }

    /// The value placed under `aps.alert`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::PlainText(s) => Value::String(s.clone()),
            Self::Structured(v) => v.clone(),
        }
    }

    /// Serialize for storage.
    pub fn to_stored(&self) -> Result<StoredAlert> {
        Ok(match self {
            Self::PlainText(s) => StoredAlert {
                text: s.clone(),
                is_json: false,
            },
            Self::Structured(v) => StoredAlert {
                text: serde_json::to_string(v)?,
                is_json: true,
            },
        })
    }

    /// Rebuild an alert from its stored text.
    ///
    /// `is_json` is `None` for records written before the flag existed. Those
    /// are decoded opportunistically: text that parses as JSON is returned
    /// structured, anything else is returned verbatim. When the flag is
    /// present it is trusted and a decode failure is an error.
    pub fn from_stored(text: &str, is_json: Option<bool>) -> Result<Self> {
        match is_json {
            Some(true) => serde_json::from_str(text)
                .map(Self::Structured)
                .map_err(NotificationError::AlertDecode),
            Some(false) => Ok(Self::PlainText(text.to_owned())),
            None => match serde_json::from_str::<Value>(text) {
                Ok(value) => Ok(Self::Structured(value)),
                Err(e) => {
                    warn!(error = %e, "legacy alert is not JSON, using raw text");
                    Ok(Self::PlainText(text.to_owned()))
                }
            },
        }
    }
}

impl From<&str> for Alert {
    fn from(s: &str) -> Self {
        Self::PlainText(s.to_owned())
    }
}

impl From<String> for Alert {
    fn from(s: String) -> Self {
        Self::PlainText(s)
    }
}

impl From<Map<String, Value>> for Alert {
    fn from(map: Map<String, Value>) -> Self {
        Self::Structured(Value::Object(map))
    }
}
