//! Command-line interface definitions and handlers.

/// CLI argument parsing with clap.
pub mod args;

/// Subcommand implementations.
pub mod commands;

/// Terminal output sink for streaming translations.
pub mod sink;

pub use args::{Args, Command};
pub use sink::TerminalSink;
