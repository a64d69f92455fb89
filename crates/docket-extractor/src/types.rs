//! Batch tickets, store events and run reports

use docket_domain::{ExtractionItem, ItemStatus};

/// Identifies the batch a store mutation belongs to
///
/// Every `begin_batch` bumps the store generation. Writes carrying an older
/// ticket are stale and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchTicket {
    pub(crate) generation: u64,
}

impl BatchTicket {
    /// The batch generation this ticket was issued for
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Change notifications emitted by the item store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A new batch replaced all previous items
    BatchStarted {
        /// Generation of the new batch
        generation: u64,
        /// Number of pending items created
        total: usize,
    },

    /// One item changed (status transition or value edit)
    ItemUpdated {
        /// Generation the item belongs to
        generation: u64,
        /// The item after the change
        item: ExtractionItem,
    },

    /// Every item of the batch reached a terminal state
    BatchCompleted {
        /// Generation that finished
        generation: u64,
    },
}

/// Point-in-time copy of the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    /// Batch generation the items belong to
    pub generation: u64,

    /// Whether the batch has finished
    pub complete: bool,

    /// Items in input order
    pub items: Vec<ExtractionItem>,
}

impl StoreSnapshot {
    /// Number of items with the given status
    pub fn count(&self, status: ItemStatus) -> usize {
        self.items.iter().filter(|i| i.status() == status).count()
    }
}

/// Outcome of one `Orchestrator::run`
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// Generation of the batch
    pub generation: u64,

    /// Documents in the batch
    pub total: usize,

    /// Items committed as `Success`
    pub succeeded: usize,

    /// Items committed as `Error`
    pub failed: usize,

    /// Items not committed because a newer batch took over
    pub abandoned: usize,

    /// Wall-clock time for the run in milliseconds
    pub elapsed_ms: u64,

    /// Whether a newer batch replaced this one before it finished
    pub superseded: bool,
}

impl BatchReport {
    /// Generate a one-line summary
    pub fn summary(&self) -> String {
        let mut line = format!(
            "Batch {}: {} documents, {} succeeded, {} failed in {}ms",
            self.generation, self.total, self.succeeded, self.failed, self.elapsed_ms
        );
        if self.superseded {
            line.push_str(&format!(" (superseded, {} abandoned)", self.abandoned));
        }
        line
    }
}
