//! Device token normalization and decoding.
//!
//! Tokens are often copied from `NSData` descriptions such as
//! `<a1b2c3d4 e5f6...>`. Normalization strips spaces and angle brackets and
//! nothing else; hex validity is only checked when the frame is encoded.

use std::fmt;

use pushframe_core::text::token_prefix;
use serde::{Deserialize, Serialize};

use crate::errors::{NotificationError, Result};

/// Byte length of a device token as issued by APNs.
pub const DEVICE_TOKEN_BYTES: usize = 32;

/// Remove every space, `<` and `>` from a raw token string.
pub fn normalize_device_token(raw: &str) -> String {
    raw.chars().filter(|c| !matches!(c, ' ' | '<' | '>')).collect()
}

/// A normalized device token in hex text form.
///
/// Construction always normalizes, so a `DeviceToken` never contains a
/// space or an angle bracket.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DeviceToken(String);

impl DeviceToken {
    /// Normalize `raw` into a token.
    pub fn new(raw: &str) -> Self {
        Self(normalize_device_token(raw))
    }

    /// The normalized hex text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the hex text into raw token bytes.
    ///
    /// The decoded length is not checked against [`DEVICE_TOKEN_BYTES`].
    pub fn decode(&self) -> Result<Vec<u8>> {
        hex::decode(&self.0).map_err(|source| NotificationError::InvalidDeviceToken {
            token_prefix: token_prefix(&self.0),
            source,
        })
    }
}

impl fmt::Display for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DeviceToken {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for DeviceToken {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<DeviceToken> for String {
    fn from(token: DeviceToken) -> Self {
        token.0
    }
}
