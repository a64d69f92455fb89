//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Document, FieldSet, Record};
use async_trait::async_trait;

/// Trait for the external per-document extraction call
///
/// Implemented by the infrastructure layer (docket-llm). The service is a
/// black box: document bytes and the requested field names go in, a flat
/// record keyed by those names comes out. Fields the service cannot find
/// must be present as `FieldValue::Null`, never omitted.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Error type for extraction failures; rendered into the item's message
    type Error: std::fmt::Display + Send;

    /// Extract the requested fields from one document
    async fn extract(&self, document: &Document, fields: &FieldSet) -> Result<Record, Self::Error>;

    /// Short name used in logs
    fn name(&self) -> &str {
        "extraction-service"
    }
}
