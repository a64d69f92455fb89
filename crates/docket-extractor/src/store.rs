//! Shared, observable store of extraction items

use crate::error::StoreError;
use crate::types::{BatchTicket, StoreEvent, StoreSnapshot};
use docket_domain::{ExtractionItem, FieldValue, ItemId, Record};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::debug;

/// Buffered events per subscriber before slow readers start lagging
const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Default)]
struct StoreState {
    generation: u64,
    complete: bool,
    items: Vec<ExtractionItem>,
    index: HashMap<ItemId, usize>,
}

impl StoreState {
    fn item_mut(&mut self, id: ItemId) -> Option<&mut ExtractionItem> {
        let idx = *self.index.get(&id)?;
        self.items.get_mut(idx)
    }

    fn replace(&mut self, items: Vec<ExtractionItem>) {
        self.generation += 1;
        self.index = items.iter().enumerate().map(|(i, item)| (item.id(), i)).collect();
        self.items = items;
    }
}

/// Cloneable handle to the item store of the current batch
///
/// All mutations happen under a write lock and swap whole item states, so
/// concurrent readers see each item either before or after a transition,
/// never in between. Every mutation returns the updated item and broadcasts
/// a [`StoreEvent`] to subscribers.
#[derive(Debug, Clone)]
pub struct ItemStore {
    state: Arc<RwLock<StoreState>>,
    events: broadcast::Sender<StoreEvent>,
}

impl ItemStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            events,
        }
    }

    /// Subscribe to store change events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Discard all items and start a new batch of pending items
    ///
    /// Returns the ticket for the new batch and the item ids in input order.
    pub fn begin_batch<I, S>(&self, file_names: I) -> (BatchTicket, Vec<ItemId>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<ExtractionItem> = file_names.into_iter().map(ExtractionItem::pending).collect();
        let ids = items.iter().map(ExtractionItem::id).collect();
        let total = items.len();

        let generation = {
            let mut state = self.write();
            state.replace(items);
            state.complete = false;
            state.generation
        };

        self.emit(StoreEvent::BatchStarted { generation, total });
        (BatchTicket { generation }, ids)
    }

    /// Replace the store with already finished items, e.g. a saved batch
    ///
    /// Fails without touching the store if two items share an id.
    pub fn restore(&self, items: Vec<ExtractionItem>) -> Result<BatchTicket, StoreError> {
        let mut seen = HashSet::with_capacity(items.len());
        if let Some(dup) = items.iter().map(ExtractionItem::id).find(|id| !seen.insert(*id)) {
            return Err(StoreError::DuplicateId(dup));
        }

        let total = items.len();
        let generation = {
            let mut state = self.write();
            state.replace(items);
            state.complete = true;
            state.generation
        };

        self.emit(StoreEvent::BatchStarted { generation, total });
        self.emit(StoreEvent::BatchCompleted { generation });
        Ok(BatchTicket { generation })
    }

    /// Whether the ticket still belongs to the current batch
    pub fn is_current(&self, ticket: BatchTicket) -> bool {
        self.read().generation == ticket.generation
    }

    /// Mark an item `Processing`; `None` if the ticket is stale
    pub fn mark_processing(&self, ticket: BatchTicket, id: ItemId) -> Option<ExtractionItem> {
        self.transition(ticket, id, ExtractionItem::begin_processing)
    }

    /// Commit an extraction outcome; `None` if the ticket is stale
    pub fn commit(
        &self,
        ticket: BatchTicket,
        id: ItemId,
        outcome: Result<Record, String>,
    ) -> Option<ExtractionItem> {
        self.transition(ticket, id, move |item| match outcome {
            Ok(record) => item.complete_success(record),
            Err(message) => item.complete_error(message),
        })
    }

    /// Mark the batch complete; `false` if the ticket is stale
    pub fn finish_batch(&self, ticket: BatchTicket) -> bool {
        {
            let mut state = self.write();
            if state.generation != ticket.generation {
                return false;
            }
            state.complete = true;
        }

        self.emit(StoreEvent::BatchCompleted {
            generation: ticket.generation,
        });
        true
    }

    /// Edit one value of a finished item without changing its status
    pub fn update_value(
        &self,
        id: ItemId,
        field: &str,
        value: FieldValue,
    ) -> Result<ExtractionItem, StoreError> {
        let (generation, item) = {
            let mut state = self.write();
            let generation = state.generation;
            let item = state.item_mut(id).ok_or(StoreError::NotFound(id))?;
            item.set_value(field, value)
                .map_err(|source| StoreError::Edit { id, source })?;
            (generation, item.clone())
        };

        self.emit(StoreEvent::ItemUpdated {
            generation,
            item: item.clone(),
        });
        Ok(item)
    }

    /// Copy of the whole store
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.read();
        StoreSnapshot {
            generation: state.generation,
            complete: state.complete,
            items: state.items.clone(),
        }
    }

    /// Copy of the items in input order
    pub fn items(&self) -> Vec<ExtractionItem> {
        self.read().items.clone()
    }

    /// Copy of one item
    pub fn get(&self, id: ItemId) -> Option<ExtractionItem> {
        let state = self.read();
        state.index.get(&id).and_then(|&idx| state.items.get(idx)).cloned()
    }

    /// Current batch generation (0 before the first batch)
    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    /// Whether the current batch has finished
    pub fn is_complete(&self) -> bool {
        self.read().complete
    }

    /// Number of items in the current batch
    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    /// Whether the store holds no items
    pub fn is_empty(&self) -> bool {
        self.read().items.is_empty()
    }

    fn transition<F>(&self, ticket: BatchTicket, id: ItemId, apply: F) -> Option<ExtractionItem>
    where
        F: FnOnce(&mut ExtractionItem),
    {
        let item = {
            let mut state = self.write();
            if state.generation != ticket.generation {
                debug!(
                    "Dropping stale write for item {} (batch {}, current {})",
                    id, ticket.generation, state.generation
                );
                return None;
            }
            let item = state.item_mut(id)?;
            apply(item);
            item.clone()
        };

        self.emit(StoreEvent::ItemUpdated {
            generation: ticket.generation,
            item: item.clone(),
        });
        Some(item)
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}
