//! Configure command handler for editing default settings.

use anyhow::Result;
use inquire::{Confirm, Password, PasswordDisplayMode, Text};
use url::Url;

use crate::config::{
    API_KEY_ENV, ConfigFile, ConfigManager, ResolveOptions, TranslationConfig, resolve_config,
};
use crate::ui::{Style, handle_prompt_cancellation};

/// Runs the configure command.
///
/// With `--show` prints the resolved configuration; otherwise interactively
/// edits endpoint, model, target language, auto-translate, and the stored
/// API key.
pub fn run_configure(show: bool) -> Result<()> {
    if show {
        return show_config();
    }
    handle_prompt_cancellation(run_configure_inner)
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default();
    let defaults = TranslationConfig::default();

    print_current(&config);

    let endpoint = Text::new("API endpoint:")
        .with_default(
            config
                .mdtl
                .api_endpoint
                .as_deref()
                .unwrap_or(&defaults.api_endpoint),
        )
        .with_help_message("OpenAI-compatible API root, including /v1")
        .prompt()?;

    if Url::parse(endpoint.trim()).is_err() {
        eprintln!(
            "{} '{}' is not a well-formed URL; translation requests will be rejected",
            Style::warning("Warning:"),
            endpoint.trim()
        );
    }

    let model = Text::new("Model:")
        .with_default(config.mdtl.model.as_deref().unwrap_or(&defaults.model))
        .prompt()?;

    let target_language = Text::new("Target language:")
        .with_default(
            config
                .mdtl
                .target_language
                .as_deref()
                .unwrap_or(&defaults.target_language),
        )
        .with_help_message("Language code such as zh-CN, ja, en")
        .prompt()?;

    let auto_translate = Confirm::new("Translate automatically when a preview opens?")
        .with_default(config.mdtl.auto_translate.unwrap_or(defaults.auto_translate))
        .prompt()?;

    let api_key = Password::new("API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message(&format!(
            "Leave empty to keep the current value; prefer the {API_KEY_ENV} environment variable"
        ))
        .prompt()?;

    config.mdtl.api_endpoint = Some(endpoint.trim().to_string());
    config.mdtl.model = Some(model.trim().to_string());
    config.mdtl.target_language = Some(target_language.trim().to_string());
    config.mdtl.auto_translate = Some(auto_translate);
    if !api_key.trim().is_empty() {
        config.mdtl.api_key = Some(api_key.trim().to_string());
    }

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );

    Ok(())
}

fn print_current(config: &ConfigFile) {
    println!("{}", Style::header("Current settings"));
    print_line("endpoint", config.mdtl.api_endpoint.as_deref());
    print_line("model", config.mdtl.model.as_deref());
    print_line("to", config.mdtl.target_language.as_deref());
    print_line(
        "auto",
        config.mdtl.auto_translate.map(|b| b.to_string()).as_deref(),
    );
    println!();
}

fn print_line(label: &str, value: Option<&str>) {
    println!(
        "  {:10} {}",
        Style::label(label),
        value.map_or_else(|| Style::secondary("(not set)"), Style::value)
    );
}

fn show_config() -> Result<()> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_or_default();
    let resolved = resolve_config(&ResolveOptions::default(), &file_config);

    println!("{}", Style::header("Resolved configuration"));
    println!("  {:16} {}", Style::label("endpoint"), Style::value(&resolved.api_endpoint));
    println!("  {:16} {}", Style::label("model"), Style::value(&resolved.model));
    println!("  {:16} {}", Style::label("to"), Style::value(&resolved.target_language));
    println!(
        "  {:16} {}",
        Style::label("auto_translate"),
        Style::value(resolved.auto_translate)
    );
    println!(
        "  {:16} {}",
        Style::label("api_key"),
        if resolved.api_key.is_empty() {
            Style::secondary("(not set)")
        } else {
            Style::value("********")
        }
    );
    println!();
    println!(
        "{}",
        Style::hint(format!(
            "Config file: {}",
            manager.config_path().display()
        ))
    );

    Ok(())
}
