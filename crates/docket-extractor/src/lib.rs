//! Docket Extractor
//!
//! Drives a batch of documents through the extraction lifecycle and keeps the
//! results in an observable item store.
//!
//! # Overview
//!
//! A batch starts by placing one `Pending` item per document into the
//! [`ItemStore`], in input order. The [`Orchestrator`] then calls the injected
//! extraction service once per document, marking each item `Processing` right
//! before the call and committing `Success` or `Error` the moment it returns.
//! One document failing never affects the others.
//!
//! # Architecture
//!
//! ```text
//! Documents → Orchestrator → ExtractionService → ItemStore → (grouping, export)
//!                                                    │
//!                                                    └─ StoreEvent subscribers
//! ```
//!
//! # Key Features
//!
//! - **Sequential by default**: one call in flight, honoring upstream rate limits
//! - **Bounded concurrency**: opt in via `OrchestratorConfig::concurrency`
//! - **Atomic commits**: readers never see a half-updated item
//! - **Batch generations**: completions from a superseded batch are dropped
//! - **Timeouts and retries** around each call, panics contained per item
//!
//! # Example Usage
//!
//! ```no_run
//! use docket_domain::{Document, FieldSet};
//! use docket_extractor::{Orchestrator, OrchestratorConfig};
//! use docket_llm::MockService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = MockService::new(r#"{"Customer": "Acme"}"#);
//! let orchestrator = Orchestrator::new(service, OrchestratorConfig::default());
//!
//! let fields = FieldSet::from_names(["Customer", "Grand Total"]);
//! let documents = vec![Document::new("a.txt", "..."), Document::new("b.txt", "...")];
//!
//! let report = orchestrator.run(documents, &fields).await?;
//! println!("{}", report.summary());
//!
//! for item in orchestrator.store().items() {
//!     println!("{} {}", item.file_name(), item.status());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod orchestrator;
mod store;
mod types;


pub use config::OrchestratorConfig;
pub use error::{OrchestratorError, StoreError};
pub use orchestrator::Orchestrator;
pub use store::ItemStore;
pub use types::{BatchReport, BatchTicket, StoreEvent, StoreSnapshot};
