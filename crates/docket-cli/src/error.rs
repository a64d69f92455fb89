//! Error types for the CLI application.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A document or batch file could not be read
    #[error("Cannot read {}: {source}", .path.display())]
    ReadFile {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Batch run rejected before it started
    #[error("Extraction error: {0}")]
    Orchestrator(#[from] docket_extractor::OrchestratorError),

    /// Item edit rejected by the store
    #[error("Edit rejected: {0}")]
    Store(#[from] docket_extractor::StoreError),

    /// Field list change rejected
    #[error("Field error: {0}")]
    Fields(#[from] docket_domain::FieldSetError),

    /// Nothing to summarize or export
    #[error("{0}")]
    Summary(#[from] docket_summary::SummaryError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
