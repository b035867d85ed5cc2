//! # pushframe-apns
//!
//! Apple Push Notification service, legacy binary interface.
//!
//! - **Model**: [`Notification`] with normalizing setters, typed
//!   [`Alert`] and [`ExtraPayload`]
//! - **Payload**: [`build_payload`] produces the ordered `aps` / `mdm` JSON
//! - **Frame**: [`encode_frame`] packs the enhanced format (command 1),
//!   [`ParsedFrame::parse`] reads it back
//! - **Records**: [`NotificationRecord`] is the flat storage shape with
//!   reserved attribute keys and the alert "is JSON" flag
//!
//! Nothing here talks to the network or persists anything; frames are handed
//! to whatever transport the caller owns.
//!
//! ## Crate Position
//!
//! Depends on `pushframe-core` for log-safe token prefixes.

#![deny(unsafe_code)]

pub mod alert;
pub mod errors;
pub mod extra;
pub mod frame;
pub mod notification;
pub mod payload;
pub mod record;
pub mod token;

pub use alert::{Alert, StoredAlert};
pub use errors::{ErrorCategory, NotificationError, Result};
pub use extra::{CONTENT_AVAILABLE_KEY, CustomData, ExtraPayload, MDM_KEY};
pub use frame::{ParsedFrame, encode_frame};
pub use notification::Notification;
pub use payload::{build_payload, payload_size, payload_text};
pub use record::NotificationRecord;
pub use token::{DEVICE_TOKEN_BYTES, DeviceToken, normalize_device_token};
