mod client;
mod events;
mod hash;
mod orchestrator;
mod prompt;
mod session;
mod sse;

pub use client::{CompletionBackend, CompletionRequest, DeltaStream, TranslationClient};
pub use events::{MemorySink, OutputSink, PreviewEvent, SessionStatus};
pub use hash::fingerprint;
pub use orchestrator::{ClosedOutcome, Document, Orchestrator, RequestOutcome};
pub use prompt::{DEFAULT_SYSTEM_PROMPT, build_system_prompt};
pub use session::{SessionOutcome, StreamingSession, TranslationError};
