//! App-specific payload data carried next to `aps`.
//!
//! Callers see two explicit shapes instead of a generic mapping with
//! reserved keys: standard custom data (with an optional content-available
//! flag) or a Mobile Device Management payload. The reserved keys only
//! exist in the flattened attribute mapping used for storage.

use serde_json::{Map, Value};

use crate::errors::{NotificationError, Result};

/// Reserved attribute key marking an MDM payload in stored attributes.
pub const MDM_KEY: &str = "__rapns_mdm__";

/// Reserved attribute key marking a content-available notification in
/// stored attributes.
pub const CONTENT_AVAILABLE_KEY: &str = "__rapns_content_available__";

/// Custom data placed at the top level of a payload.
pub type CustomData = Map<String, Value>;

/// Everything in a notification beyond alert, badge and sound.
#[derive(Clone, Debug, PartialEq)]
pub enum ExtraPayload {
    /// A regular `aps` notification.
    Standard {
        /// App-specific keys appended next to `aps`.
        custom: CustomData,
        /// Emit `"content-available": 1` for background delivery.
        content_available: bool,
    },
    /// An MDM wake-up; the value becomes the whole payload's `mdm` key.
    Mdm(Value),
}

impl Default for ExtraPayload {
    fn default() -> Self {
        Self::Standard {
            custom: CustomData::new(),
            content_available: false,
        }
    }
}

impl ExtraPayload {
    /// Whether this is an MDM payload.
    pub fn is_mdm(&self) -> bool {
        matches!(self, Self::Mdm(_))
    }

    /// Whether the content-available flag is set.
    pub fn content_available(&self) -> bool {
        matches!(
            self,
            Self::Standard {
                content_available: true,
                ..
            }
        )
    }

    /// Custom keys, empty for MDM payloads.
    pub fn custom(&self) -> Option<&CustomData> {
        match self {
            Self::Standard { custom, .. } => Some(custom),
            Self::Mdm(_) => None,
        }
    }

    /// Parse a flattened attribute mapping, lifting the reserved keys.
    ///
    /// An MDM key wins over everything else. The content-available key is
    /// set when its value is anything other than `null` or `false`.
    pub fn from_attributes(attrs: Value) -> Result<Self> {
        let Value::Object(mut map) = attrs else {
            return Err(not_a_mapping(&attrs));
        };

        if let Some(magic) = map.remove(MDM_KEY) {
            return Ok(Self::Mdm(magic));
        }

        let content_available = map
            .shift_remove(CONTENT_AVAILABLE_KEY)
            .is_some_and(|v| !matches!(v, Value::Null | Value::Bool(false)));

        Ok(Self::Standard {
            custom: map,
            content_available,
        })
    }

    /// Flatten into an attribute mapping, re-inserting the reserved keys.
    ///
    /// Returns `None` when there is nothing to store.
    pub fn to_attributes(&self) -> Option<Value> {
        match self {
            Self::Mdm(magic) => {
                let mut map = Map::new();
                let _ = map.insert(MDM_KEY.to_owned(), magic.clone());
                Some(Value::Object(map))
            }
            Self::Standard {
                custom,
                content_available,
            } => {
                if custom.is_empty() && !content_available {
                    return None;
                }
                let mut map = custom.clone();
                if *content_available {
                    let _ = map.insert(CONTENT_AVAILABLE_KEY.to_owned(), Value::Bool(true));
                }
                Some(Value::Object(map))
            }
        }
    }
}

/// Text form of a custom value as it appears in the payload.
///
/// Strings pass through unquoted, `null` becomes the empty string, and
/// everything else is rendered as compact JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Error for custom data that is not a JSON mapping.
pub(crate) fn not_a_mapping(value: &Value) -> NotificationError {
    NotificationError::InvalidArgument(format!(
        "attributes_for_device must be a mapping, got {}",
        json_kind(value)
    ))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn non_mapping_is_rejected() {
        for bad in [json!("x"), json!([1, 2]), json!(3), Value::Null, json!(true)] {
            assert_matches!(
                ExtraPayload::from_attributes(bad),
                Err(NotificationError::InvalidArgument(msg)) if msg.contains("must be a mapping")
            );
        }
    }

    #[test]
    fn plain_mapping_is_custom_data() {
        let extra = ExtraPayload::from_attributes(json!({"foo": "bar", "n": 1})).unwrap();
        assert!(!extra.is_mdm());
        assert!(!extra.content_available());
        assert_eq!(extra.custom().unwrap().len(), 2);
    }

    #[test]
    fn mdm_key_wins() {
        let extra = ExtraPayload::from_attributes(json!({
            "foo": "bar",
            CONTENT_AVAILABLE_KEY: true,
            MDM_KEY: "XYZ",
        }))
        .unwrap();
        assert_eq!(extra, ExtraPayload::Mdm(json!("XYZ")));
        assert!(extra.custom().is_none());
    }

    #[test]
    fn content_available_key_is_lifted() {
        let extra =
            ExtraPayload::from_attributes(json!({"a": 1, CONTENT_AVAILABLE_KEY: true, "b": 2}))
                .unwrap();
        assert!(extra.content_available());
        let keys: Vec<_> = extra.custom().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn content_available_truthiness() {
        let truthy = [json!(true), json!(1), json!(0), json!("no"), json!({})];
        for v in truthy {
            let extra = ExtraPayload::from_attributes(json!({CONTENT_AVAILABLE_KEY: v})).unwrap();
            assert!(extra.content_available());
        }
        for v in [json!(false), Value::Null] {
            let extra = ExtraPayload::from_attributes(json!({CONTENT_AVAILABLE_KEY: v})).unwrap();
            assert!(!extra.content_available());
        }
    }

    #[test]
    fn attributes_round_trip() {
        let extra = ExtraPayload::Standard {
            custom: json!({"foo": "bar"}).as_object().unwrap().clone(),
            content_available: true,
        };
        let attrs = extra.to_attributes().unwrap();
        assert_eq!(attrs, json!({"foo": "bar", CONTENT_AVAILABLE_KEY: true}));
        assert_eq!(ExtraPayload::from_attributes(attrs).unwrap(), extra);

        let mdm = ExtraPayload::Mdm(json!("XYZ"));
        assert_eq!(
            ExtraPayload::from_attributes(mdm.to_attributes().unwrap()).unwrap(),
            mdm
        );
    }

    #[test]
    fn empty_standard_stores_nothing() {
        assert_eq!(ExtraPayload::default().to_attributes(), None);
    }

    #[test]
    fn value_text_coercion() {
        assert_eq!(value_to_text(&json!("bar")), "bar");
        assert_eq!(value_to_text(&json!(5)), "5");
        assert_eq!(value_to_text(&json!(1.5)), "1.5");
        assert_eq!(value_to_text(&json!(true)), "true");
        assert_eq!(value_to_text(&Value::Null), "");
        assert_eq!(value_to_text(&json!([1, "a"])), r#"[1,"a"]"#);
        assert_eq!(value_to_text(&json!({"k": "v"})), r#"{"k":"v"}"#);
    }
}
