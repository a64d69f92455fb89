//! Error types for the Extractor

use docket_domain::{ItemEditError, ItemId};
use thiserror::Error;

/// Errors that prevent a batch from starting
///
/// Per-document failures are never returned here; they are recorded on the
/// item as `Error` and the batch carries on.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// No documents were supplied
    #[error("Batch has no documents")]
    EmptyBatch,

    /// No fields were requested
    #[error("Field set is empty")]
    EmptyFieldSet,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors from direct item store edits and restores
#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    /// No item with this id in the current batch
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    /// Two restored items share one id
    #[error("Duplicate item id: {0}")]
    DuplicateId(ItemId),

    /// The item exists but cannot be edited
    #[error("Cannot edit item {id}: {source}")]
    Edit {
        /// Item that rejected the edit
        id: ItemId,
        /// Underlying reason
        source: ItemEditError,
    },
}
