//! Summarize command implementation.

use crate::batch::BatchFile;
use crate::cli::SummarizeArgs;
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use docket_domain::{ExtractionItem, FieldSet, FieldValue, ItemId};
use docket_extractor::ItemStore;
use docket_summary::{export_groups, export_items, ExportTable, GroupingEngine, SummaryError};
use std::collections::HashSet;

/// A value correction parsed from `ID:FIELD=VALUE`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueEdit {
    /// Item id or unique id prefix
    pub selector: String,
    /// Field to change
    pub field: String,
    /// New value; empty input means null
    pub value: FieldValue,
}

/// Execute the summarize command.
pub async fn execute_summarize(args: SummarizeArgs, formatter: &Formatter) -> Result<()> {
    let batch = BatchFile::load(&args.batch)?;
    let fields = batch.field_set();

    let store = ItemStore::new();
    store.restore(batch.to_items()?)?;

    let edits = args
        .set
        .iter()
        .map(|raw| parse_edit(raw))
        .collect::<Result<Vec<_>>>()?;
    apply_edits(&store, &edits)?;

    let items = store.items();
    let selection = resolve_selection(&items, &args.select)?;
    println!("{}", render_selection(&items, &fields, &selection, args.items, formatter)?);

    if args.write && !edits.is_empty() {
        BatchFile::from_items(&fields, &items).save(&args.batch)?;
        if formatter.format() == OutputFormat::Table {
            println!(
                "{}",
                formatter.success(&format!("Wrote {} edit(s) to {}", edits.len(), args.batch.display()))
            );
        }
    }

    Ok(())
}

/// Render the selected items.
///
/// A summary with no successful items is reported as nothing to show; the
/// per-item sheet still fails.
pub fn render_selection(
    items: &[ExtractionItem],
    fields: &FieldSet,
    selection: &HashSet<ItemId>,
    per_item: bool,
    formatter: &Formatter,
) -> Result<String> {
    match build_table(items, fields, selection, per_item) {
        Ok(table) => formatter.format_table(&table),
        Err(CliError::Summary(SummaryError::NothingToExport(reason))) if !per_item => {
            Ok(formatter.info(&format!("Nothing to summarize: {}", reason)))
        }
        Err(e) => Err(e),
    }
}

/// Summary sheet (or per-item sheet) for the selected items.
pub fn build_table(
    items: &[ExtractionItem],
    fields: &FieldSet,
    selection: &HashSet<ItemId>,
    per_item: bool,
) -> Result<ExportTable> {
    let table = if per_item {
        export_items(items, fields, Some(selection))?
    } else {
        export_groups(&GroupingEngine::summarize(items, selection, fields))?
    };
    Ok(table)
}

/// Parse `ID:FIELD=VALUE`.
pub fn parse_edit(raw: &str) -> Result<ValueEdit> {
    let invalid = || CliError::InvalidInput(format!("Invalid edit '{}'. Expected 'ID:FIELD=VALUE'", raw));

    let (selector, rest) = raw.split_once(':').ok_or_else(invalid)?;
    let (field, value) = rest.split_once('=').ok_or_else(invalid)?;
    if selector.trim().is_empty() || field.trim().is_empty() {
        return Err(invalid());
    }

    let value = if value.trim().is_empty() {
        FieldValue::Null
    } else {
        FieldValue::Text(value.to_string())
    };

    Ok(ValueEdit {
        selector: selector.trim().to_string(),
        field: field.trim().to_string(),
        value,
    })
}

/// Apply edits to the store; each must target a successful item.
pub fn apply_edits(store: &ItemStore, edits: &[ValueEdit]) -> Result<()> {
    for edit in edits {
        let id = find_item(&store.items(), &edit.selector)?;
        store.update_value(id, &edit.field, edit.value.clone())?;
    }
    Ok(())
}

/// Ids named on the command line, or every item when none are.
pub fn resolve_selection(items: &[ExtractionItem], selectors: &[String]) -> Result<HashSet<ItemId>> {
    if selectors.is_empty() {
        return Ok(items.iter().map(ExtractionItem::id).collect());
    }
    selectors.iter().map(|s| find_item(items, s)).collect()
}

/// Resolve a full id or a unique id prefix.
fn find_item(items: &[ExtractionItem], selector: &str) -> Result<ItemId> {
    let needle = selector.to_lowercase();
    let mut matches = items
        .iter()
        .map(ExtractionItem::id)
        .filter(|id| id.to_string().starts_with(&needle));

    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => Err(CliError::InvalidInput(format!("No item matches '{}'", selector))),
        (Some(_), Some(_)) => Err(CliError::InvalidInput(format!(
            "'{}' matches more than one item",
            selector
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_domain::Record;
    use docket_extractor::StoreError;

    fn items() -> Vec<ExtractionItem> {
        vec![
            ExtractionItem::restored(
                ItemId::new(),
                "a.pdf",
                Ok(Record::new().with("Customer", "Acme").with("Grand Total", "100")),
            ),
            ExtractionItem::restored(
                ItemId::new(),
                "b.pdf",
                Ok(Record::new().with("Customer", "acme ").with("Grand Total", "250")),
            ),
            ExtractionItem::restored(ItemId::new(), "c.pdf", Err("unreadable".to_string())),
        ]
    }

    fn fields() -> FieldSet {
        FieldSet::from_names(["Customer", "Grand Total"])
    }

    #[test]
    fn test_parse_edit() {
        let edit = parse_edit("0192abcd:Grand Total=1,200").unwrap();
        assert_eq!(edit.selector, "0192abcd");
        assert_eq!(edit.field, "Grand Total");
        assert_eq!(edit.value, FieldValue::Text("1,200".to_string()));

        assert_eq!(parse_edit("id:Job No=").unwrap().value, FieldValue::Null);
        assert!(parse_edit("no-separator").is_err());
        assert!(parse_edit(":Field=1").is_err());
    }

    #[test]
    fn test_selection_defaults_to_everything() {
        let items = items();
        assert_eq!(resolve_selection(&items, &[]).unwrap().len(), 3);
    }

    #[test]
    fn test_selection_by_full_id() {
        let items = items();
        let selection = resolve_selection(&items, &[items[1].id().to_string()]).unwrap();
        assert_eq!(selection.len(), 1);
        assert!(selection.contains(&items[1].id()));
    }

    #[test]
    fn test_unknown_selector_rejected() {
        let items = items();
        assert!(resolve_selection(&items, &["zzzz".to_string()]).is_err());
    }

    #[test]
    fn test_summary_table_groups_customers() {
        let items = items();
        let selection = resolve_selection(&items, &[]).unwrap();
        let table = build_table(&items, &fields(), &selection, false).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, "Customer"), Some("Acme"));
        assert_eq!(table.cell(0, "Grand Total"), Some("100, 250"));
        assert_eq!(table.cell(0, "Files"), Some("2"));
    }

    #[test]
    fn test_selection_of_failed_item_is_nothing_to_export() {
        let items = items();
        let selection = resolve_selection(&items, &[items[2].id().to_string()]).unwrap();
        let err = build_table(&items, &fields(), &selection, true).unwrap_err();
        assert!(matches!(err, CliError::Summary(SummaryError::NothingToExport(_))));
    }

    #[test]
    fn test_empty_summary_is_nothing_to_show() {
        let items = items();
        let selection = resolve_selection(&items, &[items[2].id().to_string()]).unwrap();
        let formatter = Formatter::new(OutputFormat::Table, false);

        let rendered = render_selection(&items, &fields(), &selection, false, &formatter).unwrap();
        assert!(rendered.contains("Nothing to summarize"));

        let err = render_selection(&items, &fields(), &selection, true, &formatter).unwrap_err();
        assert!(matches!(err, CliError::Summary(SummaryError::NothingToExport(_))));
    }

    #[test]
    fn test_edits_change_summary() {
        let items = items();
        let store = ItemStore::new();
        store.restore(items.clone()).unwrap();

        let edit = parse_edit(&format!("{}:Grand Total=100", items[1].id())).unwrap();
        apply_edits(&store, &[edit]).unwrap();

        let edited = store.items();
        let selection = resolve_selection(&edited, &[]).unwrap();
        let table = build_table(&edited, &fields(), &selection, false).unwrap();
        assert_eq!(table.cell(0, "Grand Total"), Some("100"));
    }

    #[test]
    fn test_edit_on_failed_item_rejected() {
        let items = items();
        let store = ItemStore::new();
        store.restore(items.clone()).unwrap();

        let edit = parse_edit(&format!("{}:Customer=Acme", items[2].id())).unwrap();
        let err = apply_edits(&store, &[edit]).unwrap_err();
        assert!(matches!(err, CliError::Store(StoreError::Edit { .. })));
    }
}
