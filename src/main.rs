use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mdtl_cli::cli::commands::{configure, translate};
use mdtl_cli::cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout stays clean for piped output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Some(Command::Configure { show }) => {
            configure::run_configure(show)?;
        }
        None => {
            let options = translate::TranslateOptions {
                file: args.file,
                to: args.to,
                endpoint: args.endpoint,
                model: args.model,
                quiet: args.quiet,
            };
            translate::run_translate(options).await?;
        }
    }

    Ok(())
}
