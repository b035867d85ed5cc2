//! Error types for notification construction and encoding.
//!
//! Every error aborts work on a single notification only. Nothing in this
//! crate retries; callers decide whether a failed notification is dropped
//! or fixed and resubmitted.

use std::fmt;

use thiserror::Error;

/// Stage at which an error was raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A caller passed a value the notification model cannot hold.
    Construction,
    /// The notification could not be turned into a payload or frame.
    Encoding,
    /// Stored data or a received frame could not be read back.
    Decoding,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Construction => write!(f, "construction"),
            Self::Encoding => write!(f, "encoding"),
            Self::Decoding => write!(f, "decoding"),
        }
    }
}

/// Errors raised while building, encoding, or decoding a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// A value of the wrong shape was assigned (e.g. non-mapping custom data).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The device token is not valid hex.
    #[error("device token {token_prefix} is not valid hex: {source}")]
    InvalidDeviceToken {
        /// Log-safe prefix of the offending token.
        token_prefix: String,
        /// Underlying hex decoding failure.
        #[source]
        source: hex::FromHexError,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored alert flagged as JSON did not decode.
    #[error("alert is flagged as JSON but does not decode: {0}")]
    AlertDecode(#[source] serde_json::Error),

    /// The payload does not fit the 2-byte length field.
    #[error("payload is {size} bytes; the frame length field holds at most {max}")]
    PayloadTooLarge {
        /// Encoded payload size in bytes.
        size: usize,
        /// Largest representable size.
        max: usize,
    },

    /// A byte sequence is not a well-formed enhanced-format frame.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
}

impl NotificationError {
    /// Stage at which this error was raised.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument(_) => ErrorCategory::Construction,
            Self::InvalidDeviceToken { .. } | Self::Json(_) | Self::PayloadTooLarge { .. } => {
                ErrorCategory::Encoding
            }
            Self::AlertDecode(_) | Self::MalformedFrame(_) => ErrorCategory::Decoding,
        }
    }
}

/// Result type for notification operations.
pub type Result<T> = std::result::Result<T, NotificationError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_display() {
        let err = NotificationError::InvalidArgument("attributes must be a mapping".into());
        assert_eq!(err.to_string(), "invalid argument: attributes must be a mapping");
        assert_eq!(err.category(), ErrorCategory::Construction);
    }

    #[test]
    fn invalid_token_keeps_source() {
        let source = hex::decode("abc").unwrap_err();
        let err = NotificationError::InvalidDeviceToken {
            token_prefix: "abc".into(),
            source,
        };
        assert!(err.to_string().contains("abc"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.category(), ErrorCategory::Encoding);
    }

    #[test]
    fn payload_too_large_display() {
        let err = NotificationError::PayloadTooLarge {
            size: 70_000,
            max: 65_535,
        };
        assert!(err.to_string().contains("70000"));
        assert!(err.to_string().contains("65535"));
    }

    #[test]
    fn decoding_category() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            NotificationError::AlertDecode(json_err).category(),
            ErrorCategory::Decoding
        );
        assert_eq!(
            NotificationError::MalformedFrame("short".into()).category(),
            ErrorCategory::Decoding
        );
    }

    #[test]
    fn category_display() {
        assert_eq!(ErrorCategory::Encoding.to_string(), "encoding");
    }
}
