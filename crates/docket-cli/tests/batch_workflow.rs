//! Extract, save, reload and summarize a batch end to end with the mock service

use docket_cli::commands::extract::{read_documents, run_batch};
use docket_cli::commands::summarize::{apply_edits, build_table, parse_edit, resolve_selection};
use docket_cli::config::OutputFormat;
use docket_cli::{BatchFile, Formatter};
use docket_domain::{FieldSet, ItemStatus};
use docket_extractor::{ItemStore, OrchestratorConfig};
use docket_llm::MockService;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_documents(dir: &TempDir) -> Vec<PathBuf> {
    ["inv-1.txt", "inv-2.txt", "inv-3.txt", "inv-4.txt"]
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            fs::write(&path, format!("Invoice body of {}", name)).unwrap();
            path
        })
        .collect()
}

fn scripted_service() -> MockService {
    let mut service = MockService::new("{}");
    service.add_response(
        "inv-1.txt",
        r#"{"Customer": "Acme Corp", "Job No": "J1", "Grand Total": 100}"#,
    );
    service.add_response(
        "inv-2.txt",
        r#"{"Customer": " acme corp ", "Job No": "J2", "Grand Total": 100}"#,
    );
    service.add_failure("inv-3.txt", "model refused");
    service.add_response(
        "inv-4.txt",
        r#"{"customer": "Globex", "job no": "J7", "Grand Total": null}"#,
    );
    service
}

#[tokio::test]
async fn test_extract_save_and_summarize() {
    let dir = TempDir::new().unwrap();
    let paths = write_documents(&dir);
    let fields = FieldSet::from_names(["Customer", "Job No", "Grand Total"]);
    let formatter = Formatter::new(OutputFormat::Quiet, false);

    let documents = read_documents(&paths).await.unwrap();
    let outcome = run_batch(
        scripted_service(),
        OrchestratorConfig::default(),
        documents,
        &fields,
        &formatter,
    )
    .await
    .unwrap();

    assert_eq!(outcome.report.succeeded, 3);
    assert_eq!(outcome.report.failed, 1);
    let statuses: Vec<ItemStatus> = outcome.items.iter().map(|i| i.status()).collect();
    assert_eq!(
        statuses,
        vec![ItemStatus::Success, ItemStatus::Success, ItemStatus::Error, ItemStatus::Success]
    );
    assert_eq!(outcome.items[2].error(), Some("Extraction error: model refused"));

    let batch_path = dir.path().join("batch.json");
    BatchFile::from_items(&fields, &outcome.items).save(&batch_path).unwrap();

    let loaded = BatchFile::load(&batch_path).unwrap();
    let items = loaded.to_items().unwrap();
    let selection = resolve_selection(&items, &[]).unwrap();
    let table = build_table(&items, &loaded.field_set(), &selection, false).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.cell(0, "Customer"), Some("Acme Corp"));
    assert_eq!(table.cell(0, "Job Numbers"), Some("J1, J2"));
    assert_eq!(table.cell(0, "Grand Total"), Some("100"));
    assert_eq!(table.cell(0, "Files"), Some("2"));
    assert_eq!(table.cell(1, "Customer"), Some("Globex"));
    assert_eq!(table.cell(1, "Grand Total"), Some("-"));
}

#[tokio::test]
async fn test_item_export_after_edit() {
    let dir = TempDir::new().unwrap();
    let paths = write_documents(&dir);
    let fields = FieldSet::from_names(["Customer", "Job No", "Grand Total"]);
    let formatter = Formatter::new(OutputFormat::Quiet, false);

    let documents = read_documents(&paths).await.unwrap();
    let outcome = run_batch(scripted_service(), OrchestratorConfig::default(), documents, &fields, &formatter)
        .await
        .unwrap();

    let store = ItemStore::new();
    store.restore(outcome.items.clone()).unwrap();
    let globex = outcome.items[3].id().to_string();
    let edit = parse_edit(&format!("{}:Grand Total=75.00", globex)).unwrap();
    apply_edits(&store, &[edit]).unwrap();

    let items = store.items();
    let selection = resolve_selection(&items, &[globex]).unwrap();
    let table = build_table(&items, &fields, &selection, true).unwrap();

    assert_eq!(table.headers, vec!["fileName", "Customer", "Job No", "Grand Total"]);
    assert_eq!(table.rows, vec![vec!["inv-4.txt", "Globex", "J7", "75.00"]]);
}

#[tokio::test]
async fn test_empty_field_list_fails_fast() {
    let dir = TempDir::new().unwrap();
    let paths = write_documents(&dir);
    let formatter = Formatter::new(OutputFormat::Quiet, false);
    let service = MockService::new("{}");

    let documents = read_documents(&paths).await.unwrap();
    let result = run_batch(
        service.clone(),
        OrchestratorConfig::default(),
        documents,
        &FieldSet::new(),
        &formatter,
    )
    .await;

    assert!(result.is_err());
    assert_eq!(service.call_count(), 0);
}
