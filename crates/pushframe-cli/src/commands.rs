//! Subcommand implementations. Each returns the text printed on stdout.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use clap::ValueEnum;
use pushframe_apns::{Notification, ParsedFrame};
use pushframe_settings::PushframeSettings;
use tracing::{info, warn};

use crate::input::NotificationInput;

/// Text encoding of a printed frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FrameFormat {
    /// Lowercase hex.
    #[default]
    Hex,
    /// Standard base64 with padding.
    Base64,
}

/// Read the whole of `path`, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input: {}", path.display())),
        None => {
            let mut text = String::new();
            let _ = std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn notification_from(text: &str, settings: &PushframeSettings) -> Result<Notification> {
    NotificationInput::from_json(text)?.into_notification(&settings.notification, Utc::now())
}

fn check_payload_size(notification: &Notification, settings: &PushframeSettings) -> Result<()> {
    let size = notification.payload_size()?;
    let limit = settings.frame.warn_payload_bytes;
    if size > limit {
        warn!(payload_size = size, limit, "payload is larger than the legacy gateway accepts");
    }
    Ok(())
}

/// `pushframe payload`: the JSON payload text.
pub fn payload(text: &str, settings: &PushframeSettings) -> Result<String> {
    let notification = notification_from(text, settings)?;
    check_payload_size(&notification, settings)?;
    Ok(notification.payload()?)
}

/// `pushframe frame`: the encoded binary frame as text.
pub fn frame(
    text: &str,
    settings: &PushframeSettings,
    for_validation: bool,
    format: FrameFormat,
) -> Result<String> {
    let notification = notification_from(text, settings)?;
    check_payload_size(&notification, settings)?;
    let bytes = notification
        .encode_frame(for_validation)
        .context("Failed to encode frame")?;
    info!(frame_size = bytes.len(), ?format, "frame encoded");

    Ok(match format {
        FrameFormat::Hex => hex::encode(&bytes),
        FrameFormat::Base64 => STANDARD.encode(&bytes),
    })
}

/// `pushframe inspect`: parsed fields of a hex frame, as pretty JSON.
///
/// Whitespace anywhere in the hex text is ignored.
pub fn inspect(text: &str) -> Result<String> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = hex::decode(&compact).context("frame is not valid hex")?;
    let parsed = ParsedFrame::parse(&bytes)?;
    Ok(serde_json::to_string_pretty(&parsed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn token() -> String {
        "0f".repeat(32)
    }

    fn input() -> String {
        json!({
            "deviceToken": token(),
            "alert": {"body": "hi"},
            "badge": 2,
            "identifier": 7,
            "expiry": 1_000,
        })
        .to_string()
    }

    #[test]
    fn payload_prints_json() {
        let out = payload(&input(), &PushframeSettings::default()).unwrap();
        assert_eq!(out, r#"{"aps":{"alert":{"body":"hi"},"badge":2}}"#);
    }

    #[test]
    fn frame_hex_then_inspect() {
        let settings = PushframeSettings::default();
        let hex_frame = frame(&input(), &settings, false, FrameFormat::Hex).unwrap();
        assert!(hex_frame.starts_with("0100000007000003e80020"));

        let parsed: Value = serde_json::from_str(&inspect(&hex_frame).unwrap()).unwrap();
        assert_eq!(parsed["identifier"], 7);
        assert_eq!(parsed["expiry"], 1_000);
        assert_eq!(parsed["tokenLength"], 32);
        assert_eq!(parsed["deviceToken"], token());
        assert_eq!(parsed["payload"], r#"{"aps":{"alert":{"body":"hi"},"badge":2}}"#);
    }

    #[test]
    fn frame_for_validation_zeroes_identifier() {
        let out = frame(&input(), &PushframeSettings::default(), true, FrameFormat::Hex).unwrap();
        assert!(out.starts_with("0100000000"));
    }

    #[test]
    fn frame_base64() {
        let settings = PushframeSettings::default();
        let b64 = frame(&input(), &settings, false, FrameFormat::Base64).unwrap();
        let hex_frame = frame(&input(), &settings, false, FrameFormat::Hex).unwrap();
        assert_eq!(hex::encode(STANDARD.decode(b64).unwrap()), hex_frame);
    }

    #[test]
    fn inspect_ignores_whitespace() {
        let hex_frame = frame(&input(), &PushframeSettings::default(), false, FrameFormat::Hex).unwrap();
        let spaced = format!("  {}\n{}\n", &hex_frame[..20], &hex_frame[20..]);
        assert!(inspect(&spaced).is_ok());
    }

    #[test]
    fn inspect_rejects_garbage() {
        assert!(inspect("zz").is_err());
        assert!(inspect("02").is_err());
    }

    #[test]
    fn bad_token_is_reported() {
        let text = json!({"deviceToken": "xyz", "expiry": 1}).to_string();
        let err = frame(&text, &PushframeSettings::default(), false, FrameFormat::Hex).unwrap_err();
        assert!(format!("{err:#}").contains("not valid hex"));
    }

    #[test]
    fn read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("n.json");
        std::fs::write(&path, input()).unwrap();
        assert_eq!(read_input(Some(&path)).unwrap(), input());
    }

    #[test]
    fn read_input_missing_file() {
        let err = read_input(Some(Path::new("/nonexistent/n.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read input"));
    }
}
