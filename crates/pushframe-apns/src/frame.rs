//! Enhanced binary frame encoding and parsing.
//!
//! ```text
//! ┌─────────┬────────────┬──────────┬───────────┬───────────┬──────────┬─────────────┬─────────┐
//! │ Command │ Identifier │ Expiry   │ Tok. pref.│ Tok. len. │ Token    │ Payload len │ Payload │
//! │ 1 byte  │ uint32 BE  │ uint32 BE│ 1 byte (0)│ 1 byte(32)│ n bytes  │ uint16 BE   │ n bytes │
//! └─────────┴────────────┴──────────┴───────────┴───────────┴──────────┴─────────────┴─────────┘
//! ```
//!
//! The token-length bytes are constants rather than the decoded token
//! length. Read together they form the big-endian `u16` 32 that the gateway
//! expects, so a token that does not decode to 32 bytes still gets a frame
//! claiming 32. That mismatch is not checked here.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use pushframe_core::text::token_prefix;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::{NotificationError, Result};
use crate::notification::Notification;
use crate::payload::payload_text;
use crate::token::DEVICE_TOKEN_BYTES;

/// Command byte of the enhanced format.
pub const COMMAND_ENHANCED: u8 = 1;

/// Byte written where a token length prefix would go.
///
/// Always zero, never the computed token length. Whether the gateway
/// relies on this is unconfirmed; keep it until checked against the live
/// service.
pub const TOKEN_LENGTH_PREFIX: u8 = 0;

/// Token length the frame declares, whatever the real token length is.
pub const TOKEN_LENGTH_INDICATOR: u8 = 32;

/// Bytes before the device token: command, identifier, expiry, two
/// token-length bytes.
pub const HEADER_SIZE: usize = 11;

/// Largest payload the 2-byte length field can describe.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Encode `notification` as an enhanced-format frame.
///
/// With `for_validation` the identifier field is written as `0`, so a
/// frame built only to be checked can never be confused with a real send.
pub fn encode_frame(notification: &Notification, for_validation: bool) -> Result<Bytes> {
    let token = notification.device_token().decode()?;
    if token.len() != DEVICE_TOKEN_BYTES {
        warn!(
            token = %token_prefix(notification.device_token().as_str()),
            token_bytes = token.len(),
            "device token is not 32 bytes, encoding anyway"
        );
    }

    let payload = payload_text(notification)?;
    let payload_len = u16::try_from(payload.len()).map_err(|_| NotificationError::PayloadTooLarge {
        size: payload.len(),
        max: MAX_PAYLOAD_LEN,
    })?;

    let identifier = if for_validation {
        0
    } else {
        notification.identifier()
    };

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + token.len() + 2 + payload.len());
    buf.put_u8(COMMAND_ENHANCED);
    buf.put_u32(identifier);
    buf.put_u32(notification.expiry());
    buf.put_u8(TOKEN_LENGTH_PREFIX);
    buf.put_u8(TOKEN_LENGTH_INDICATOR);
    buf.put_slice(&token);
    buf.put_u16(payload_len);
    buf.put_slice(payload.as_bytes());

    debug!(
        token = %token_prefix(notification.device_token().as_str()),
        identifier,
        for_validation,
        payload_size = payload.len(),
        frame_size = buf.len(),
        "encoded notification frame"
    );

    Ok(buf.freeze())
}

/// Fields of an enhanced-format frame read back from bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFrame {
    /// Command byte (always [`COMMAND_ENHANCED`] once parsed).
    pub command: u8,
    /// Identifier field.
    pub identifier: u32,
    /// Expiry field.
    pub expiry: u32,
    /// Byte before the token length indicator.
    pub token_length_prefix: u8,
    /// Declared token length.
    pub token_length: u8,
    /// Device token, hex encoded.
    pub device_token: String,
    /// Payload JSON text.
    pub payload: String,
}

impl ParsedFrame {
    /// Parse a complete frame.
    ///
    /// The token is read using the declared token length, so frames whose
    /// real token length differs from the indicator do not parse.
    pub fn parse(frame: &[u8]) -> Result<Self> {
        let mut buf = frame;
        if buf.remaining() < HEADER_SIZE {
            return Err(malformed(format!(
                "{} bytes is shorter than the {HEADER_SIZE}-byte header",
                frame.len()
            )));
        }

        let command = buf.get_u8();
        if command != COMMAND_ENHANCED {
            return Err(malformed(format!("unknown command byte {command}")));
        }
        let identifier = buf.get_u32();
        let expiry = buf.get_u32();
        let token_length_prefix = buf.get_u8();
        let token_length = buf.get_u8();

        let token_len = usize::from(token_length);
        if buf.remaining() < token_len + 2 {
            return Err(malformed(format!(
                "truncated before payload length (need {} more bytes, have {})",
                token_len + 2,
                buf.remaining()
            )));
        }
        let device_token = hex::encode(&buf[..token_len]);
        buf.advance(token_len);

        let payload_len = usize::from(buf.get_u16());
        if buf.remaining() != payload_len {
            return Err(malformed(format!(
                "payload length field says {payload_len} bytes, {} remain",
                buf.remaining()
            )));
        }
        let payload = std::str::from_utf8(buf)
            .map_err(|e| malformed(format!("payload is not UTF-8: {e}")))?
            .to_owned();

        Ok(Self {
            command,
            identifier,
            expiry,
            token_length_prefix,
            token_length,
            device_token,
            payload,
        })
    }

    /// Decode the payload text as JSON.
    pub fn payload_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.payload)?)
    }
}

fn malformed(reason: String) -> NotificationError {
    NotificationError::MalformedFrame(reason)
}
