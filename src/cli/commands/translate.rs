use anyhow::{Result, bail};
use inquire::{InquireError, Password, PasswordDisplayMode};
use std::io::IsTerminal;
use std::sync::Arc;

use crate::cache::TranslationCache;
use crate::cli::TerminalSink;
use crate::config::{
    API_KEY_ENV, ConfigError, ConfigFile, ConfigManager, ResolveOptions, resolve_config,
};
use crate::input::InputReader;
use crate::translation::{Document, Orchestrator, TranslationClient, TranslationError};
use crate::ui::Style;

pub struct TranslateOptions {
    pub file: Option<String>,
    pub to: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub quiet: bool,
}

pub async fn run_translate(options: TranslateOptions) -> Result<()> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_or_default();

    let resolve = ResolveOptions {
        to: options.to.clone(),
        endpoint: options.endpoint.clone(),
        model: options.model.clone(),
    };
    let mut config = resolve_config(&resolve, &file_config);

    let source_text = InputReader::read(options.file.as_deref())?;
    if source_text.is_empty() {
        bail!("Error: Input is empty");
    }

    let identifier = options.file.clone().unwrap_or_else(|| "stdin".to_string());
    let document = Document::new(identifier, source_text);

    let cache = Arc::new(TranslationCache::new());
    let mut orchestrator = Orchestrator::new(Arc::new(TranslationClient::new()), cache);
    let sink = Arc::new(TerminalSink::new(options.quiet));

    match orchestrator.request_translation(&document, config.clone(), sink.clone()) {
        Err(TranslationError::Config(ConfigError::MissingApiKey)) => {
            // Missing credential gets an actionable prompt instead of a
            // bare failure, when the terminal allows it.
            let Some(key) = prompt_for_api_key(&manager, &file_config, options.file.is_some())?
            else {
                bail!(
                    "API key is required\n\n\
                     Set the {API_KEY_ENV} environment variable:\n  \
                     export {API_KEY_ENV}=\"your-api-key\"\n\n\
                     Or run 'mdtl configure' to store one."
                );
            };
            let _ = sink.take_error();
            config.api_key = key;
            orchestrator.request_translation(&document, config, sink.clone())?;
        }
        Err(e) => return Err(e.into()),
        Ok(_) => {}
    }

    orchestrator.wait_for_completion().await;
    orchestrator.shutdown().await;

    if let Some(error) = sink.take_error() {
        bail!(error);
    }

    Ok(())
}

/// Asks for an API key and stores it in the config file. Returns `None`
/// when prompting is impossible (stdin already consumed by the document, or
/// not a terminal) or the user declined.
fn prompt_for_api_key(
    manager: &ConfigManager,
    file_config: &ConfigFile,
    stdin_free: bool,
) -> Result<Option<String>> {
    if !stdin_free || !std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let input = Password::new("Enter your AI API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt();

    let key = match input {
        Ok(key) => key.trim().to_string(),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            println!();
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    if key.is_empty() {
        return Ok(None);
    }

    let mut updated = file_config.clone();
    updated.mdtl.api_key = Some(key.clone());
    manager.save(&updated)?;

    eprintln!(
        "{} API key saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );

    Ok(Some(key))
}
