//! Error types for summaries and export

use thiserror::Error;

/// Errors from the export adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    /// No successful item (or summary row) qualifies for export
    #[error("Nothing to export: {0}")]
    NothingToExport(String),
}
