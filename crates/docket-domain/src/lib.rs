//! Docket Domain Layer
//!
//! Value types and collaborator traits shared by every Docket crate. Nothing in
//! here performs I/O; the orchestrator, the grouping engine and the CLI all
//! build on these definitions.
//!
//! ## Key Concepts
//!
//! - **ExtractionItem**: one document's progress through a batch
//!   (`Pending → Processing → Success | Error`)
//! - **Record**: the flat, ordered field map an extraction produces
//! - **FieldSet**: the user's ordered, duplicate-free list of field names
//! - **Role**: a fixed semantic category the grouping engine understands
//! - **ExtractionService**: the external, possibly failing extraction call
//!
//! ## Architecture
//!
//! - Pure value types with invariants enforced by construction
//! - Trait definitions for the external extraction collaborator
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod field_set;
pub mod item;
pub mod record;
pub mod role;
pub mod traits;

// Re-exports for convenience
pub use document::Document;
pub use field_set::{FieldSet, FieldSetError};
pub use item::{ExtractionItem, ItemEditError, ItemId, ItemStatus};
pub use record::{FieldValue, Record};
pub use role::Role;
pub use traits::ExtractionService;
