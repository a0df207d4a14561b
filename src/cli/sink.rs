//! Terminal implementation of the preview output sink.

use std::io::{self, Write};
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::translation::{OutputSink, PreviewEvent, SessionStatus};
use crate::ui::Spinner;

/// Streams translation output to the terminal: chunks to stdout (for
/// piping), everything else to a stderr spinner.
pub struct TerminalSink {
    spinner: Mutex<Option<Spinner>>,
    error: Mutex<Option<String>>,
    streamed: AtomicBool,
}

impl TerminalSink {
    /// Creates the sink; with `quiet` the spinner is suppressed and only
    /// translation output reaches the terminal.
    pub fn new(quiet: bool) -> Self {
        let spinner = if quiet {
            None
        } else {
            Some(Spinner::new("Preparing translation..."))
        };
        Self {
            spinner: Mutex::new(spinner),
            error: Mutex::new(None),
            streamed: AtomicBool::new(false),
        }
    }

    /// Takes the error reported by the session, if any. The CLI turns this
    /// into a nonzero exit.
    pub fn take_error(&self) -> Option<String> {
        self.error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn stop_spinner(&self) {
        if let Some(spinner) = self
            .spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            spinner.stop();
        }
    }

    fn set_spinner_message(&self, message: &str) {
        if let Some(spinner) = self
            .spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            spinner.set_message(message);
        }
    }
}

impl OutputSink for TerminalSink {
    fn emit(&self, event: PreviewEvent) {
        match event {
            PreviewEvent::Start => {}
            PreviewEvent::Status { status } => {
                let message = match status {
                    SessionStatus::ConfigChecking => "Checking configuration...",
                    SessionStatus::CacheChecking => "Checking cache...",
                    SessionStatus::ApiConnecting => "Connecting to API...",
                    SessionStatus::Translating => "Translating...",
                    SessionStatus::Completing => "Finishing up...",
                    SessionStatus::Aborted => {
                        self.stop_spinner();
                        return;
                    }
                };
                self.set_spinner_message(message);
            }
            PreviewEvent::Progress { status, .. } => {
                self.set_spinner_message(&status);
            }
            PreviewEvent::Chunk { content } => {
                self.stop_spinner();
                self.streamed.store(true, Ordering::Relaxed);
                print!("{content}");
                let _ = io::stdout().flush();
            }
            PreviewEvent::Complete => {
                self.stop_spinner();
                if self.streamed.load(Ordering::Relaxed) {
                    println!();
                }
            }
            PreviewEvent::Error { error } => {
                self.stop_spinner();
                *self.error.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
            }
        }
    }
}
