//! Docket Summary
//!
//! Consolidates per-document extraction results into per-customer summary
//! rows, and shapes items and summaries into tables for export.
//!
//! # Overview
//!
//! Users name their fields however they like ("Client", "Bill To", "Job #").
//! The [`FieldMatcher`] maps those names onto a fixed set of
//! [`Role`](docket_domain::Role)s through a priority table of patterns. The
//! [`GroupingEngine`] then groups the selected, successful items by their
//! normalized customer value and collects the distinct values seen for every
//! other role.
//!
//! Everything here is a pure function of its inputs: no caches, no I/O, safe
//! to call from any number of readers against a store snapshot.
//!
//! # Example
//!
//! ```
//! use docket_domain::{ExtractionItem, FieldSet, ItemId, Record, Role};
//! use docket_summary::GroupingEngine;
//! use std::collections::HashSet;
//!
//! let fields = FieldSet::from_names(["Customer", "Job No", "Grand Total"]);
//! let a = ExtractionItem::restored(ItemId::new(), "a.pdf",
//!     Ok(Record::new().with("Customer", "Acme").with("Job No", "J1").with("Grand Total", "100")));
//! let b = ExtractionItem::restored(ItemId::new(), "b.pdf",
//!     Ok(Record::new().with("Customer", "acme").with("Job No", "J2").with("Grand Total", "100")));
//!
//! let selection: HashSet<ItemId> = [a.id(), b.id()].into_iter().collect();
//! let groups = GroupingEngine::summarize(&[a, b], &selection, &fields);
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].customer_name, "Acme");
//! assert_eq!(groups[0].display(Role::JobNumber), "J1, J2");
//! assert_eq!(groups[0].display(Role::GrandTotal), "100");
//! assert_eq!(groups[0].file_count, 2);
//! ```

#![warn(missing_docs)]

mod error;
mod export;
mod grouping;
mod matcher;
mod ordered_set;

pub use error::SummaryError;
pub use export::{export_groups, export_items, ExportTable, FILE_NAME_COLUMN};
pub use grouping::{normalize_key, GroupRecord, GroupingEngine, UNKNOWN_CUSTOMER};
pub use matcher::{FieldMatcher, ResolvedRoles};
pub use ordered_set::OrderedSet;
