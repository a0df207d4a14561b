//! One in-flight streaming translation.
//!
//! A session moves through `Idle → Streaming → {Completed | Aborted |
//! BackgroundCompleting → Completed}`. The state is carried by three pieces:
//! a monotonically growing delta counter, a one-shot cancellation token, and
//! a detachable sink slot. Detaching the sink never cancels the remote
//! stream; cancelling never touches the sink slot.

use futures_util::StreamExt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::client::{CompletionBackend, CompletionRequest};
use super::events::{OutputSink, PreviewEvent, SessionStatus};
use super::prompt::build_system_prompt;
use crate::config::{ConfigError, TranslationConfig};

/// Terminal failure of a translation request.
///
/// Cancellation is deliberately not represented here: a cancelled session is
/// a clean stop, reported as [`SessionOutcome::Cancelled`].
#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Translation failed: {0}")]
    Remote(String),
}

/// How a session ended, when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Natural end-of-stream; carries the full accumulated translation.
    Completed(String),
    /// Stopped by cancellation. Nothing may be cached.
    Cancelled,
}

/// A streaming translation bound to one document and target language.
///
/// The orchestrator owns the session for its lifetime; the output sink is
/// only referenced and can be detached at any point without affecting the
/// session's progress toward completion.
pub struct StreamingSession {
    total_bytes: usize,
    received_bytes: AtomicUsize,
    streaming_started: AtomicBool,
    cancel: CancellationToken,
    sink: Mutex<Option<Arc<dyn OutputSink>>>,
}

impl StreamingSession {
    /// Creates a session expecting roughly `total_bytes` of source content.
    ///
    /// `total_bytes` is only the denominator for the progress percentage,
    /// not a byte-exact contract with the remote service.
    pub fn new(total_bytes: usize, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            total_bytes,
            received_bytes: AtomicUsize::new(0),
            streaming_started: AtomicBool::new(false),
            cancel: CancellationToken::new(),
            sink: Mutex::new(Some(sink)),
        }
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn received_bytes(&self) -> usize {
        self.received_bytes.load(Ordering::Relaxed)
    }

    /// True once the first non-empty delta has been relayed.
    pub fn has_started_streaming(&self) -> bool {
        self.streaming_started.load(Ordering::Relaxed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Progress percentage, rounded. A zero-length source reports 0% so it
    /// can never become eligible for background completion.
    pub fn progress(&self) -> u32 {
        if self.total_bytes == 0 {
            return 0;
        }
        let received = self.received_bytes() as f64;
        (received / self.total_bytes as f64 * 100.0).round() as u32
    }

    /// The background-completion rule, evaluated once when the consumer
    /// disappears: keep draining unattended iff streaming has started and
    /// progress has crossed the halfway mark.
    pub fn should_complete_in_background(&self) -> bool {
        self.has_started_streaming() && self.progress() >= 50
    }

    /// Cancels the session. One-shot and idempotent; checked cooperatively
    /// at every suspension point, so the transport request is not guaranteed
    /// to be torn down immediately.
    pub fn abort(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        self.emit(PreviewEvent::Status {
            status: SessionStatus::Aborted,
        });
    }

    /// Drops the sink reference without touching session state. Safe to call
    /// repeatedly, and a no-op after completion.
    pub fn detach_sink(&self) {
        *self.sink_slot() = None;
    }

    pub fn has_sink(&self) -> bool {
        self.sink_slot().is_some()
    }

    fn sink_slot(&self) -> std::sync::MutexGuard<'_, Option<Arc<dyn OutputSink>>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Forwards an event to the sink, if one is still attached.
    pub(crate) fn emit(&self, event: PreviewEvent) {
        let sink = self.sink_slot().clone();
        if let Some(sink) = sink {
            sink.emit(event);
        }
    }

    fn note_delta(&self, len: usize) {
        self.streaming_started.store(true, Ordering::Relaxed);
        self.received_bytes.fetch_add(len, Ordering::Relaxed);
    }

    /// Drives the remote stream to its end, relaying deltas in order.
    ///
    /// Returns the accumulated translation on natural end-of-stream and
    /// `Cancelled` on a cooperative stop; a remote failure surfaces as
    /// [`TranslationError::Remote`] unless it was caused by cancellation.
    /// The caller is responsible for the cache write and the terminal
    /// `complete`/`error` event.
    pub async fn translate(
        &self,
        backend: &dyn CompletionBackend,
        config: &TranslationConfig,
        source_text: &str,
    ) -> Result<SessionOutcome, TranslationError> {
        self.emit(PreviewEvent::Status {
            status: SessionStatus::ApiConnecting,
        });

        let request = CompletionRequest {
            model: config.model.clone(),
            system_prompt: build_system_prompt(&config.system_prompt, &config.target_language),
            source_text: source_text.to_string(),
        };

        let mut stream = match backend.stream_completion(config, request).await {
            Ok(stream) => stream,
            Err(e) if self.cancel.is_cancelled() => {
                debug!(error = %e, "connection failed after cancellation, stopping cleanly");
                return Ok(SessionOutcome::Cancelled);
            }
            Err(e) => return Err(TranslationError::Remote(e.to_string())),
        };

        self.emit(PreviewEvent::Status {
            status: SessionStatus::Translating,
        });

        let mut accumulated = String::new();

        loop {
            let item = tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    debug!("translation aborted");
                    return Ok(SessionOutcome::Cancelled);
                }
                item = stream.next() => item,
            };

            let Some(result) = item else { break };

            let delta = match result {
                Ok(delta) => delta,
                Err(e) if self.cancel.is_cancelled() => {
                    debug!(error = %e, "stream failed after cancellation, stopping cleanly");
                    return Ok(SessionOutcome::Cancelled);
                }
                Err(e) => return Err(TranslationError::Remote(e.to_string())),
            };

            if delta.is_empty() {
                continue;
            }

            self.note_delta(delta.len());
            let progress = self.progress();
            self.emit(PreviewEvent::Progress {
                progress,
                status: format!("Translating... {progress}%"),
            });
            accumulated.push_str(&delta);
            self.emit(PreviewEvent::Chunk { content: delta });
        }

        // Cancellation landing between the last delta and end-of-stream
        // still counts: no cache write, no completion event.
        if self.cancel.is_cancelled() {
            return Ok(SessionOutcome::Cancelled);
        }

        self.emit(PreviewEvent::Status {
            status: SessionStatus::Completing,
        });
        Ok(SessionOutcome::Completed(accumulated))
    }
}
