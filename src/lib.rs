//! # mdtl - Streaming markdown translation with a detachable preview
//!
//! `mdtl` translates markdown documents through OpenAI-compatible API
//! endpoints, streaming the result as it arrives. The translation session
//! survives its consumer: when the preview surface disappears past the
//! halfway mark, the session finishes silently in the background and parks
//! the result in an in-memory cache, so reopening the preview replays it
//! instantly.
//!
//! ## Features
//!
//! - **Streaming translations**: see the translation as it arrives
//! - **Detachable preview**: closing the output surface mid-stream either
//!   aborts cheaply or completes in the background, depending on progress
//! - **In-memory caching**: an unchanged document is never translated twice
//!   in one process
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate a file
//! mdtl ./notes.md
//!
//! # Translate from stdin
//! cat report.md | mdtl
//!
//! # Override target language
//! mdtl --to ja ./notes.md
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/mdtl/config.toml`:
//!
//! ```toml
//! [mdtl]
//! api_endpoint = "https://api.openai.com/v1"
//! model = "gpt-4"
//! target_language = "zh-CN"
//! api_key_env = "OPENAI_API_KEY"
//! ```

/// In-memory cache of completed translations.
pub mod cache;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and request snapshots.
pub mod config;

/// Input reading from files and stdin.
pub mod input;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Streaming translation: session state machine, orchestration, transport.
pub mod translation;

/// Terminal UI components (spinner, colors).
pub mod ui;
