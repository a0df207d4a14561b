//! Events forwarded from a translation session to its output sink.

use serde::Serialize;
use std::fmt;

/// Lifecycle phase reported to the preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    ConfigChecking,
    CacheChecking,
    ApiConnecting,
    Translating,
    Completing,
    Aborted,
}

impl SessionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigChecking => "config_checking",
            Self::CacheChecking => "cache_checking",
            Self::ApiConnecting => "api_connecting",
            Self::Translating => "translating",
            Self::Completing => "completing",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message consumed by the preview surface.
///
/// `Start` always precedes any `Chunk`, and a non-cached session that still
/// has a sink attached ends with exactly one terminal event (`Complete` or
/// `Error`). Cached replays emit `Start`, a single `Chunk` holding the full
/// cached content, then `Complete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreviewEvent {
    Start,
    Chunk { content: String },
    Complete,
    Error { error: String },
    Progress { progress: u32, status: String },
    Status { status: SessionStatus },
}

/// Consumer of session output.
///
/// The session holds a sink by reference (`Arc`), never owns it: detaching
/// the sink must not stop the translation it was attached to. Implementations
/// must tolerate events arriving from a background task.
pub trait OutputSink: Send + Sync {
    fn emit(&self, event: PreviewEvent);
}

/// A sink that records every event it receives, in order.
///
/// Useful for embedders that want to inspect a session after the fact, and
/// for tests asserting event ordering.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: std::sync::Mutex<Vec<PreviewEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the events received so far.
    pub fn events(&self) -> Vec<PreviewEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl OutputSink for MemorySink {
    fn emit(&self, event: PreviewEvent) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(SessionStatus::ConfigChecking.as_str(), "config_checking");
        assert_eq!(SessionStatus::CacheChecking.as_str(), "cache_checking");
        assert_eq!(SessionStatus::ApiConnecting.as_str(), "api_connecting");
        assert_eq!(SessionStatus::Translating.as_str(), "translating");
        assert_eq!(SessionStatus::Completing.as_str(), "completing");
        assert_eq!(SessionStatus::Aborted.as_str(), "aborted");
        assert_eq!(SessionStatus::Aborted.to_string(), "aborted");
    }

    #[test]
    fn test_event_serialization_shapes() {
        let chunk = PreviewEvent::Chunk {
            content: "你".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&chunk).unwrap(),
            r#"{"type":"chunk","content":"你"}"#
        );

        let status = PreviewEvent::Status {
            status: SessionStatus::ApiConnecting,
        };
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            r#"{"type":"status","status":"api_connecting"}"#
        );

        let progress = PreviewEvent::Progress {
            progress: 42,
            status: "Translating... 42%".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&progress).unwrap(),
            r#"{"type":"progress","progress":42,"status":"Translating... 42%"}"#
        );

        assert_eq!(
            serde_json::to_string(&PreviewEvent::Start).unwrap(),
            r#"{"type":"start"}"#
        );
    }

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.emit(PreviewEvent::Start);
        sink.emit(PreviewEvent::Complete);

        assert_eq!(sink.events(), vec![PreviewEvent::Start, PreviewEvent::Complete]);
    }
}
