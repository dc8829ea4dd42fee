//! CLI parse: clap types for textmint. No behavior; definitions only.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Textmint CLI - generate, store and verify text payloads
#[derive(Parser)]
#[command(name = "textmint")]
#[command(about = "Generate text remotely or locally, store it, and record SHA-256 digests")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (where textmint.toml is looked up)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate, store and (optionally) hash `count` items
    Run(RunArgs),
    /// Print the SHA-256 digest of a file
    Hash {
        /// File to hash
        file: PathBuf,
        /// Streaming chunk size in bytes
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// Check artifacts against their .sha256 sidecars
    Verify {
        /// Artifact files to check
        #[arg(required = true)]
        artifacts: Vec<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// Per-run overrides; unset flags keep the configured value.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Number of items to generate
    #[arg(long)]
    pub count: Option<usize>,

    /// Characters per item
    #[arg(long)]
    pub char_length: Option<usize>,

    /// Remote model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature (0.0-2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Output directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Skip digest sidecars
    #[arg(long)]
    pub no_hash: bool,

    /// Seed for the local generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use only the local generator
    #[arg(long)]
    pub offline: bool,

    /// Summary format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
