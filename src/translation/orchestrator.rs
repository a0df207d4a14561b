//! Session lifecycle coordination.
//!
//! The orchestrator is the sole owner of the "current session" reference
//! (one instance per preview surface, never a process-wide singleton). On
//! every lifecycle event it decides whether an in-flight translation is
//! aborted, finished silently in the background, or served from the cache.

use std::sync::Arc;
use std::time::SystemTime;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use super::client::CompletionBackend;
use super::events::{OutputSink, PreviewEvent, SessionStatus};
use super::session::{SessionOutcome, StreamingSession, TranslationError};
use crate::cache::{CacheEntry, TranslationCache, cache_key};
use crate::config::{TranslationConfig, validate_config};

/// A source document to translate.
#[derive(Debug, Clone)]
pub struct Document {
    /// Stable identifier of the source (file path, URI, ...). Part of the
    /// cache key.
    pub identifier: String,
    /// The full source text.
    pub text: String,
}

impl Document {
    pub fn new(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            text: text.into(),
        }
    }
}

/// How a translate-request was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Replayed from the cache; no session was created.
    CachedReplay,
    /// A new streaming session was started.
    SessionStarted,
}

/// The decision taken when the preview surface closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedOutcome {
    NoActiveSession,
    /// The session keeps draining the remote stream to populate the cache.
    BackgroundCompletion,
    Aborted,
}

struct ActiveSession {
    session: Arc<StreamingSession>,
    handle: JoinHandle<()>,
}

/// Coordinates streaming sessions against preview lifecycle events.
pub struct Orchestrator {
    backend: Arc<dyn CompletionBackend>,
    cache: Arc<TranslationCache>,
    tracker: TaskTracker,
    current: Option<ActiveSession>,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn CompletionBackend>, cache: Arc<TranslationCache>) -> Self {
        Self {
            backend,
            cache,
            tracker: TaskTracker::new(),
            current: None,
        }
    }

    /// True while a session is tracked (a detached background session no
    /// longer counts).
    pub fn has_active_session(&self) -> bool {
        self.current.is_some()
    }

    /// Handles a translate-request.
    ///
    /// Validates the config snapshot before anything else, replays a cache
    /// hit without creating a session, and otherwise supersedes any tracked
    /// session unconditionally before spawning a new one bound to `sink`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request_translation(
        &mut self,
        document: &Document,
        config: TranslationConfig,
        sink: Arc<dyn OutputSink>,
    ) -> Result<RequestOutcome, TranslationError> {
        sink.emit(PreviewEvent::Status {
            status: SessionStatus::ConfigChecking,
        });

        if let Err(e) = validate_config(&config) {
            sink.emit(PreviewEvent::Error {
                error: format!("Configuration error: {e}"),
            });
            return Err(e.into());
        }

        sink.emit(PreviewEvent::Status {
            status: SessionStatus::CacheChecking,
        });

        let key = cache_key(&document.identifier, &config.target_language, &document.text);

        if let Some(entry) = self.cache.get(&key) {
            debug!(key = %key, "cache hit, replaying stored translation");
            sink.emit(PreviewEvent::Start);
            sink.emit(PreviewEvent::Chunk {
                content: entry.content,
            });
            sink.emit(PreviewEvent::Complete);
            return Ok(RequestOutcome::CachedReplay);
        }

        // A new request always supersedes the tracked session, regardless
        // of its progress.
        if let Some(previous) = self.current.take() {
            info!("superseding active session");
            previous.session.abort();
        }

        let session = Arc::new(StreamingSession::new(document.text.len(), sink.clone()));
        sink.emit(PreviewEvent::Start);

        let task_session = session.clone();
        let backend = self.backend.clone();
        let cache = self.cache.clone();
        let source_text = document.text.clone();
        let source_identifier = document.identifier.clone();

        let handle = self.tracker.spawn(async move {
            let target_language = config.target_language.clone();
            match task_session
                .translate(backend.as_ref(), &config, &source_text)
                .await
            {
                Ok(SessionOutcome::Completed(content)) => {
                    // Re-check: a cancellation that raced natural
                    // end-of-stream must still suppress the cache write.
                    if task_session.is_cancelled() {
                        debug!("session cancelled at end-of-stream, discarding result");
                        return;
                    }
                    cache.set(
                        key,
                        CacheEntry {
                            content,
                            timestamp: SystemTime::now(),
                            source_identifier,
                            target_language,
                        },
                    );
                    task_session.emit(PreviewEvent::Complete);
                }
                Ok(SessionOutcome::Cancelled) => {
                    debug!("session halted by cancellation");
                }
                Err(e) => {
                    // With the sink detached this is swallowed: the cache
                    // stays unpopulated and the next request retries.
                    warn!(error = %e, "translation session failed");
                    task_session.emit(PreviewEvent::Error {
                        error: e.to_string(),
                    });
                }
            }
        });

        self.current = Some(ActiveSession { session, handle });
        Ok(RequestOutcome::SessionStarted)
    }

    /// Handles the preview surface going away.
    ///
    /// The background-completion decision is made exactly once, here: a
    /// session past the halfway mark keeps draining with its sink detached,
    /// anything earlier is aborted. Either way the session is no longer
    /// tracked, so a later request will not cancel a background completion.
    pub fn surface_closed(&mut self) -> ClosedOutcome {
        let Some(active) = self.current.take() else {
            return ClosedOutcome::NoActiveSession;
        };

        if active.session.should_complete_in_background() {
            info!(
                received = active.session.received_bytes(),
                total = active.session.total_bytes(),
                "surface closed, completing translation in background"
            );
            active.session.detach_sink();
            ClosedOutcome::BackgroundCompletion
        } else {
            info!(
                progress = active.session.progress(),
                started = active.session.has_started_streaming(),
                "surface closed, aborting translation"
            );
            active.session.abort();
            ClosedOutcome::Aborted
        }
    }

    /// Handles the preview surface reappearing: always a fresh
    /// translate-request cycle. A background session that already finished
    /// turns this into an instant cache replay.
    pub fn surface_reopened(
        &mut self,
        document: &Document,
        config: TranslationConfig,
        sink: Arc<dyn OutputSink>,
    ) -> Result<RequestOutcome, TranslationError> {
        self.request_translation(document, config, sink)
    }

    /// Waits for the tracked session's task to finish, leaving background
    /// sessions untouched.
    pub async fn wait_for_completion(&mut self) {
        if let Some(active) = self.current.take() {
            let _ = active.handle.await;
        }
    }

    /// Waits for every spawned session task, including detached background
    /// completions. Consumes the orchestrator; no new requests can follow.
    pub async fn shutdown(self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
