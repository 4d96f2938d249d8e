pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

use crate::types::ContentKind;

#[derive(Parser, Debug)]
#[command(
    name = "vimspec",
    version,
    about = "Drive a live Vim to check Elixir indentation and syntax rules"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every case file under a project
    Check {
        /// Project root (holds the rules and the case files)
        path: PathBuf,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Path to config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only run cases whose name matches this regex
        #[arg(long)]
        filter: Option<String>,
    },
    /// Create a default .vimspecrc.toml
    Init,
    /// Show what the editor makes of one snippet
    Probe {
        /// File holding the snippet, or `-` for stdin
        input: PathBuf,

        /// Which rule set to apply
        #[arg(short, long, value_enum)]
        kind: ContentKind,

        /// Print the syntax stack at the first match instead of reindenting
        #[arg(short, long)]
        pattern: Option<String>,

        /// Project root (holds the rules)
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Path to config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Github,
}
