//! In-memory capture of `tracing` events for tests.
//!
//! [`capture_logs`] installs a subscriber for the current thread only, so
//! parallel tests never see each other's events and the global subscriber
//! is left alone.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

/// One recorded event.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    /// Event level.
    pub level: Level,
    /// The `message` field.
    pub message: String,
    /// All other fields in recording order, values rendered as text.
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    /// Rendered value of the field `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find_map(|(k, v)| (k == name).then_some(v.as_str()))
    }

    fn mentions(&self, text: &str) -> bool {
        self.message.contains(text) || self.fields.iter().any(|(_, v)| v.contains(text))
    }
}

/// Shared handle to the events recorded so far.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<CapturedEvent>>>);

impl CapturedLogs {
    fn lock(&self) -> MutexGuard<'_, Vec<CapturedEvent>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every recorded event.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.lock().clone()
    }

    /// Whether an event at `level` has a message containing `text`.
    pub fn has_event(&self, level: Level, text: &str) -> bool {
        self.lock()
            .iter()
            .any(|e| e.level == level && e.message.contains(text))
    }

    /// First event whose message contains `text`.
    pub fn find(&self, text: &str) -> Option<CapturedEvent> {
        self.lock().iter().find(|e| e.message.contains(text)).cloned()
    }

    /// Whether `text` appears in any message or field value.
    ///
    /// Used to assert that full device tokens never reach the logs.
    pub fn mentions(&self, text: &str) -> bool {
        self.lock().iter().any(|e| e.mentions(text))
    }
}

#[derive(Default)]
struct Recorder {
    message: String,
    fields: Vec<(String, String)>,
}

impl Recorder {
    fn record(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name().to_owned(), value));
        }
    }
}

impl Visit for Recorder {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_owned());
    }

    // Integers, bools and `%`/`?` values all arrive here by default.
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field, format!("{value:?}"));
    }
}

struct CaptureLayer(CapturedLogs);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = Recorder::default();
        event.record(&mut recorder);
        self.0.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            message: recorder.message,
            fields: recorder.fields,
        });
    }
}

/// Record every event emitted on this thread until the guard is dropped.
///
/// Keep the returned guard alive for the whole test.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let guard = Registry::default()
        .with(CaptureLayer(logs.clone()))
        .set_default();
    (logs, guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_level_and_message() {
        let (logs, _guard) = capture_logs();
        tracing::warn!("legacy alert is not JSON");
        tracing::debug!("encoded");

        assert!(logs.has_event(Level::WARN, "legacy alert"));
        assert!(!logs.has_event(Level::ERROR, "legacy alert"));
        assert!(logs.has_event(Level::DEBUG, "encoded"));
        assert_eq!(logs.events().len(), 2);
    }

    #[test]
    fn renders_field_values() {
        let (logs, _guard) = capture_logs();
        let prefix = "a1b2c3d4…";
        tracing::debug!(token = %prefix, payload_size = 42_usize, for_validation = true, "frame");

        let event = logs.find("frame").unwrap();
        assert_eq!(event.field("token"), Some("a1b2c3d4…"));
        assert_eq!(event.field("payload_size"), Some("42"));
        assert_eq!(event.field("for_validation"), Some("true"));
        assert_eq!(event.field("missing"), None);
    }

    #[test]
    fn mentions_searches_fields_too() {
        let (logs, _guard) = capture_logs();
        tracing::info!(token = "deadbeef", "sent");
        assert!(logs.mentions("deadbeef"));
        assert!(logs.mentions("sent"));
        assert!(!logs.mentions("cafebabe"));
    }

    #[test]
    fn other_threads_are_not_captured() {
        let (logs, _guard) = capture_logs();
        std::thread::spawn(|| tracing::warn!("elsewhere"))
            .join()
            .unwrap();
        assert!(logs.events().is_empty());
    }

    #[test]
    fn dropping_the_guard_stops_capture() {
        let (logs, guard) = capture_logs();
        drop(guard);
        tracing::warn!("after");
        assert!(logs.events().is_empty());
    }
}
