use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "mdtl")]
#[command(about = "Streaming AI translation for markdown documents")]
#[command(version)]
pub struct Args {
    /// Markdown file to translate (reads from stdin if not provided)
    pub file: Option<String>,

    /// Target language code (e.g., zh-CN, ja, en)
    #[arg(short = 't', long = "to")]
    pub to: Option<String>,

    /// API endpoint URL (OpenAI-compatible, including the /v1 root)
    #[arg(short = 'e', long)]
    pub endpoint: Option<String>,

    /// Model name
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Suppress the spinner and status output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configure mdtl settings
    Configure {
        /// Show the resolved configuration instead of editing it
        #[arg(long)]
        show: bool,
    },
}
