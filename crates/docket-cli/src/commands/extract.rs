//! Extract command implementation.

use crate::batch::BatchFile;
use crate::cli::ExtractArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use docket_domain::{Document, ExtractionItem, ExtractionService, FieldSet, ItemId};
use docket_extractor::{BatchReport, Orchestrator, OrchestratorConfig, StoreEvent};
use docket_llm::{MockService, OllamaService};
use docket_summary::{export_groups, GroupingEngine, SummaryError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::warn;

/// Finished batch: the run report and the items in input order.
pub struct BatchOutcome {
    /// Counts and timing
    pub report: BatchReport,
    /// Items as committed
    pub items: Vec<ExtractionItem>,
}

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let fields = FieldSet::from_names(&args.fields);
    let documents = read_documents(&args.files).await?;
    let orchestrator_config = orchestrator_config(&args, config);

    let outcome = if args.mock {
        let response = args.mock_response.as_deref().unwrap_or("{}");
        run_batch(MockService::new(response), orchestrator_config, documents, &fields, formatter).await?
    } else {
        let endpoint = args.endpoint.as_deref().unwrap_or(&config.service.endpoint);
        let model = args.model.as_deref().unwrap_or(&config.service.model);
        let service = OllamaService::new(endpoint, model)
            .with_max_retries(config.service.max_retries)
            .with_timeout(orchestrator_config.call_timeout());
        run_batch(service, orchestrator_config, documents, &fields, formatter).await?
    };

    println!("{}", formatter.format_items(&outcome.items, &fields)?);
    if formatter.format() == OutputFormat::Table {
        println!("{}", formatter.batch_report(&outcome.report));
    }

    if args.summary {
        print_summary(&outcome.items, &fields, formatter)?;
    }

    if let Some(path) = &args.save {
        BatchFile::from_items(&fields, &outcome.items).save(path)?;
        if formatter.format() == OutputFormat::Table {
            println!("{}", formatter.success(&format!("Saved batch to {}", path.display())));
        }
    }

    Ok(())
}

/// Run one batch through a service and collect the finished items.
pub async fn run_batch<S>(
    service: S,
    config: OrchestratorConfig,
    documents: Vec<Document>,
    fields: &FieldSet,
    formatter: &Formatter,
) -> Result<BatchOutcome>
where
    S: ExtractionService + 'static,
{
    let orchestrator = Orchestrator::new(service, config);

    let progress = (formatter.format() == OutputFormat::Table)
        .then(|| spawn_progress(orchestrator.store().subscribe(), *formatter));

    let result = orchestrator.run(documents, fields).await;

    if let Some(handle) = progress {
        if result.is_ok() {
            let _ = handle.await;
        } else {
            handle.abort();
        }
    }

    let report = result?;
    Ok(BatchOutcome {
        report,
        items: orchestrator.store().items(),
    })
}

/// Print the per-customer summary of every successful item.
pub fn print_summary(items: &[ExtractionItem], fields: &FieldSet, formatter: &Formatter) -> Result<()> {
    let selection: HashSet<ItemId> = items.iter().map(ExtractionItem::id).collect();
    let groups = GroupingEngine::summarize(items, &selection, fields);

    match export_groups(&groups) {
        Ok(table) => println!("{}", formatter.format_table(&table)?),
        Err(SummaryError::NothingToExport(reason)) => {
            println!("{}", formatter.info(&format!("Nothing to summarize: {}", reason)));
        }
    }
    Ok(())
}

/// Read documents in argument order.
pub async fn read_documents(paths: &[PathBuf]) -> Result<Vec<Document>> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path).await.map_err(|source| CliError::ReadFile {
            path: path.clone(),
            source,
        })?;
        documents.push(Document::new(display_name(path), bytes));
    }
    Ok(documents)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn orchestrator_config(args: &ExtractArgs, config: &Config) -> OrchestratorConfig {
    let mut orchestrator = config.orchestrator.clone();
    if let Some(concurrency) = args.concurrency {
        orchestrator.concurrency = concurrency;
    }
    if let Some(timeout) = args.timeout {
        orchestrator.call_timeout_secs = timeout;
    }
    if let Some(retries) = args.retries {
        orchestrator.max_retries = retries;
    }
    orchestrator
}

/// Print one line per finished item to stderr until the batch completes.
fn spawn_progress(mut events: broadcast::Receiver<StoreEvent>, formatter: Formatter) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut total = 0;
        let mut done = 0;
        loop {
            match events.recv().await {
                Ok(StoreEvent::BatchStarted { total: count, .. }) => total = count,
                Ok(StoreEvent::ItemUpdated { item, .. }) if item.status().is_terminal() => {
                    done += 1;
                    eprintln!(
                        "[{}/{}] {} {}",
                        done,
                        total,
                        item.file_name(),
                        formatter.status(item.status())
                    );
                }
                Ok(StoreEvent::BatchCompleted { .. }) | Err(RecvError::Closed) => break,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => warn!("Progress display skipped {} events", skipped),
            }
        }
    })
}
