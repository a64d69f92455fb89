//! Core Orchestrator implementation

use crate::config::OrchestratorConfig;
use crate::error::OrchestratorError;
use crate::store::ItemStore;
use crate::types::{BatchReport, BatchTicket};
use docket_domain::{Document, ExtractionService, FieldSet, ItemId, ItemStatus, Record};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Drives a batch of documents through the extraction lifecycle
///
/// Clones share the same service and store, so a clone can start a new batch
/// while an older `run` is still in flight; the older run then stops issuing
/// calls and its late completions are discarded.
pub struct Orchestrator<S>
where
    S: ExtractionService + 'static,
{
    service: Arc<S>,
    store: ItemStore,
    config: OrchestratorConfig,
}

impl<S> Clone for Orchestrator<S>
where
    S: ExtractionService + 'static,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

/// How a single item ended up
enum ItemOutcome {
    Succeeded,
    Failed,
    Abandoned,
}

impl<S> Orchestrator<S>
where
    S: ExtractionService + 'static,
{
    /// Create a new Orchestrator with its own empty store
    pub fn new(service: S, config: OrchestratorConfig) -> Self {
        Self {
            service: Arc::new(service),
            store: ItemStore::new(),
            config,
        }
    }

    /// Use an existing store handle (e.g. one a UI already observes)
    pub fn with_store(mut self, store: ItemStore) -> Self {
        self.store = store;
        self
    }

    /// The item store this orchestrator writes into
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// Active configuration
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// The injected extraction service
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Run one batch
    ///
    /// Replaces whatever the store held with one `Pending` item per document
    /// (input order), then processes them. Per-document failures are recorded
    /// on the item; only invalid input or configuration returns `Err`.
    pub async fn run(
        &self,
        documents: Vec<Document>,
        fields: &FieldSet,
    ) -> Result<BatchReport, OrchestratorError> {
        if documents.is_empty() {
            return Err(OrchestratorError::EmptyBatch);
        }
        if fields.is_empty() {
            return Err(OrchestratorError::EmptyFieldSet);
        }
        self.config.validate().map_err(OrchestratorError::Config)?;

        let start_time = Instant::now();
        let total = documents.len();
        let (ticket, ids) = self
            .store
            .begin_batch(documents.iter().map(|d| d.file_name.clone()));

        info!(
            "Starting batch {} with {} documents, {} fields via {} (concurrency {})",
            ticket.generation(),
            total,
            fields.len(),
            self.service.name(),
            self.config.concurrency
        );

        let fields = Arc::new(fields.clone());
        let outcomes: Vec<ItemOutcome> = stream::iter(ids.into_iter().zip(documents))
            .map(|(id, document)| self.process_item(ticket, id, document, Arc::clone(&fields)))
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        let mut report = BatchReport {
            generation: ticket.generation(),
            total,
            succeeded: 0,
            failed: 0,
            abandoned: 0,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
            superseded: false,
        };
        for outcome in outcomes {
            match outcome {
                ItemOutcome::Succeeded => report.succeeded += 1,
                ItemOutcome::Failed => report.failed += 1,
                ItemOutcome::Abandoned => report.abandoned += 1,
            }
        }
        report.superseded = !self.store.finish_batch(ticket);

        if report.superseded {
            info!("Batch {} superseded: {}", report.generation, report.summary());
        } else {
            info!("{}", report.summary());
        }

        Ok(report)
    }

    /// Process one item: mark, call, commit
    async fn process_item(
        &self,
        ticket: BatchTicket,
        id: ItemId,
        document: Document,
        fields: Arc<FieldSet>,
    ) -> ItemOutcome {
        if self.store.mark_processing(ticket, id).is_none() {
            return ItemOutcome::Abandoned;
        }

        let file_name = document.file_name.clone();
        debug!("Extracting {} (item {})", file_name, id);

        let Some(outcome) = self.call_with_retry(ticket, Arc::new(document), fields).await else {
            debug!("Batch {} superseded, dropping retries for {}", ticket.generation(), file_name);
            return ItemOutcome::Abandoned;
        };

        match self.store.commit(ticket, id, outcome) {
            Some(item) if item.status() == ItemStatus::Success => {
                debug!("Extracted {}", file_name);
                ItemOutcome::Succeeded
            }
            Some(item) => {
                warn!(
                    "Extraction failed for {}: {}",
                    file_name,
                    item.error().unwrap_or("unknown error")
                );
                ItemOutcome::Failed
            }
            None => ItemOutcome::Abandoned,
        }
    }

    /// Call the service, retrying failures with exponential backoff
    ///
    /// Returns `None` once the batch is superseded; no retry is started after that.
    async fn call_with_retry(
        &self,
        ticket: BatchTicket,
        document: Arc<Document>,
        fields: Arc<FieldSet>,
    ) -> Option<Result<Record, String>> {
        let mut attempt = 0;
        loop {
            match self.call_once(Arc::clone(&document), Arc::clone(&fields)).await {
                Ok(record) => return Some(Ok(record)),
                Err(_) if !self.store.is_current(ticket) => return None,
                Err(message) if attempt < self.config.max_retries => {
                    let delay = self.config.retry_delay(attempt);
                    attempt += 1;
                    warn!(
                        "Attempt {} for {} failed ({}), retrying in {:?}",
                        attempt, document.file_name, message, delay
                    );
                    tokio::time::sleep(delay).await;
                    if !self.store.is_current(ticket) {
                        return None;
                    }
                }
                Err(message) => return Some(Err(message)),
            }
        }
    }

    /// One service call on its own task, bounded by the call timeout
    ///
    /// Running the call on a separate task contains panics in the service;
    /// they surface as an error message for this item only.
    async fn call_once(&self, document: Arc<Document>, fields: Arc<FieldSet>) -> Result<Record, String> {
        let service = Arc::clone(&self.service);
        let mut handle = tokio::spawn(async move {
            service
                .extract(&document, &fields)
                .await
                .map_err(|e| e.to_string())
        });

        match timeout(self.config.call_timeout(), &mut handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) if join_error.is_panic() => {
                Err("extraction service panicked".to_string())
            }
            Ok(Err(join_error)) => Err(format!("extraction task failed: {}", join_error)),
            Err(_) => {
                handle.abort();
                Err(format!(
                    "extraction timed out after {}s",
                    self.config.call_timeout_secs
                ))
            }
        }
    }
}
