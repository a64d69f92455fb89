//! Tabular shaping of items and summary rows for export

use crate::error::SummaryError;
use crate::grouping::GroupRecord;
use docket_domain::{ExtractionItem, FieldSet, ItemId, ItemStatus, Role};
use std::collections::HashSet;

/// Leading column of an item export
pub const FILE_NAME_COLUMN: &str = "fileName";

const FILES_COLUMN: &str = "Files";

/// A rectangular table of display strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    /// Column headers
    pub headers: Vec<String>,
    /// One entry per row, each as wide as `headers`
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell by row index and header name
    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        let column = self.headers.iter().position(|h| h == header)?;
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}

/// Successful items as `fileName` plus one column per field
///
/// With a selection, only selected items are exported. Absent and null
/// values become empty cells. Fails when no item qualifies.
pub fn export_items(
    items: &[ExtractionItem],
    fields: &FieldSet,
    selection: Option<&HashSet<ItemId>>,
) -> Result<ExportTable, SummaryError> {
    let headers: Vec<String> = std::iter::once(FILE_NAME_COLUMN.to_string())
        .chain(fields.iter().map(str::to_string))
        .collect();

    let rows: Vec<Vec<String>> = items
        .iter()
        .filter(|item| item.status() == ItemStatus::Success)
        .filter(|item| selection.is_none_or(|s| s.contains(&item.id())))
        .filter_map(|item| {
            let data = item.data()?;
            let row = std::iter::once(item.file_name().to_string())
                .chain(fields.iter().map(|field| {
                    data.get(field).map(|v| v.to_string()).unwrap_or_default()
                }))
                .collect();
            Some(row)
        })
        .collect();

    if rows.is_empty() {
        return Err(SummaryError::NothingToExport(
            "no successfully extracted items".to_string(),
        ));
    }

    Ok(ExportTable { headers, rows })
}

/// Summary rows as one line per customer group
pub fn export_groups(groups: &[GroupRecord]) -> Result<ExportTable, SummaryError> {
    if groups.is_empty() {
        return Err(SummaryError::NothingToExport(
            "no summary rows".to_string(),
        ));
    }

    let headers = Role::ALL
        .iter()
        .map(|role| role.label().to_string())
        .chain(std::iter::once(FILES_COLUMN.to_string()))
        .collect();

    let rows = groups
        .iter()
        .map(|group| {
            Role::ALL
                .iter()
                .map(|&role| group.display(role))
                .chain(std::iter::once(group.file_count.to_string()))
                .collect()
        })
        .collect();

    Ok(ExportTable { headers, rows })
}
