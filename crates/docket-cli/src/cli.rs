//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Docket CLI - Extract fields from documents and summarize them per customer.
#[derive(Debug, Parser)]
#[command(name = "docket")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DOCKET_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (minimal)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract fields from a batch of documents
    Extract(ExtractArgs),

    /// Summarize a saved batch per customer
    Summarize(SummarizeArgs),

    /// Show or edit the field list of a saved batch
    Fields(FieldsArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Documents to process, in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Field names to extract (comma separated)
    #[arg(long, required = true, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Also print the per-customer summary
    #[arg(long)]
    pub summary: bool,

    /// Write the finished batch to a JSON file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Use the offline mock service instead of Ollama
    #[arg(long)]
    pub mock: bool,

    /// JSON reply returned by the mock service for every document
    #[arg(long, requires = "mock")]
    pub mock_response: Option<String>,

    /// Ollama base URL
    #[arg(long, env = "DOCKET_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Model name
    #[arg(short, long, env = "DOCKET_MODEL")]
    pub model: Option<String>,

    /// Maximum extraction calls in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-call timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Extra attempts per failed document
    #[arg(long)]
    pub retries: Option<u32>,
}

/// Arguments for the summarize command.
#[derive(Debug, Parser)]
pub struct SummarizeArgs {
    /// Saved batch file
    pub batch: PathBuf,

    /// Item IDs to include (default: all)
    #[arg(short, long = "select")]
    pub select: Vec<String>,

    /// Correct a value before summarizing (ID:FIELD=VALUE)
    #[arg(long = "set")]
    pub set: Vec<String>,

    /// Print the per-item export table instead of the summary
    #[arg(long)]
    pub items: bool,

    /// Write edits made with --set back to the batch file
    #[arg(long)]
    pub write: bool,
}

/// Arguments for the fields command.
#[derive(Debug, Parser)]
pub struct FieldsArgs {
    /// Saved batch file
    pub batch: PathBuf,

    /// Append a field
    #[arg(long)]
    pub add: Vec<String>,

    /// Remove a field
    #[arg(long)]
    pub remove: Vec<String>,

    /// New field order (comma separated, must name every field)
    #[arg(long, value_delimiter = ',')]
    pub order: Option<Vec<String>>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
