//! Saved batch files.
//!
//! A batch file is the JSON form of a finished store plus the field list it
//! was extracted with, so it can be summarized or edited later.

use crate::error::{CliError, Result};
use docket_domain::{ExtractionItem, FieldSet, FieldValue, ItemId, ItemStatus, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fs;
use std::path::Path;

/// On-disk form of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFile {
    /// Field names in order
    pub fields: Vec<String>,

    /// Items in input order
    pub items: Vec<ItemEntry>,
}

/// On-disk form of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemEntry {
    /// Item id (UUID string)
    pub id: String,

    /// Source file name
    pub file_name: String,

    /// `success` or `error`
    pub status: String,

    /// Extracted values, present for `success`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,

    /// Failure message, present for `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchFile {
    /// Capture finished items.
    pub fn from_items(fields: &FieldSet, items: &[ExtractionItem]) -> Self {
        Self {
            fields: fields.names().to_vec(),
            items: items.iter().map(ItemEntry::from_item).collect(),
        }
    }

    /// Read and parse a batch file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| CliError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write the batch as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// The field list.
    pub fn field_set(&self) -> FieldSet {
        FieldSet::from_names(&self.fields)
    }

    /// Rebuild domain items.
    ///
    /// Values are ordered by the field list first; keys outside it follow in
    /// file order.
    pub fn to_items(&self) -> Result<Vec<ExtractionItem>> {
        let fields = self.field_set();
        self.items.iter().map(|entry| entry.to_item(&fields)).collect()
    }
}

impl ItemEntry {
    fn from_item(item: &ExtractionItem) -> Self {
        let data = item.data().map(|record| {
            record
                .iter()
                .map(|(field, value)| (field.to_string(), value_to_json(value)))
                .collect()
        });

        Self {
            id: item.id().to_string(),
            file_name: item.file_name().to_string(),
            status: item.status().as_str().to_string(),
            data,
            error: item.error().map(str::to_string),
        }
    }

    fn to_item(&self, fields: &FieldSet) -> Result<ExtractionItem> {
        let id = ItemId::from_string(&self.id)
            .map_err(|e| CliError::InvalidInput(format!("item '{}': {}", self.file_name, e)))?;

        let outcome = match ItemStatus::parse(&self.status) {
            Some(ItemStatus::Success) => Ok(self.record(fields)),
            Some(ItemStatus::Error) => Err(self.error.clone().unwrap_or_default()),
            _ => {
                return Err(CliError::InvalidInput(format!(
                    "item '{}' has unfinished status '{}'",
                    self.file_name, self.status
                )))
            }
        };

        Ok(ExtractionItem::restored(id, self.file_name.clone(), outcome))
    }

    fn record(&self, fields: &FieldSet) -> Record {
        let Some(data) = &self.data else {
            return Record::new();
        };

        let ordered = fields
            .iter()
            .filter_map(|field| data.get(field).map(|value| (field.to_string(), value)));
        let extra = data
            .iter()
            .filter(|(key, _)| !fields.contains(key))
            .map(|(key, value)| (key.clone(), value));

        ordered
            .chain(extra)
            .map(|(field, value)| (field, json_to_value(value)))
            .collect()
    }
}

fn value_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(text) => Value::String(text.clone()),
        FieldValue::Number(n) => Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null),
        FieldValue::Null => Value::Null,
    }
}

fn json_to_value(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::String(text) => FieldValue::Text(text.clone()),
        Value::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Null),
        other => FieldValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_items() -> Vec<ExtractionItem> {
        vec![
            ExtractionItem::restored(
                ItemId::new(),
                "a.pdf",
                Ok(Record::new()
                    .with("Customer", "Acme")
                    .with("Grand Total", 1250.5)
                    .with("Job No", None::<String>)),
            ),
            ExtractionItem::restored(ItemId::new(), "b.pdf", Err("timed out".to_string())),
        ]
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("batch.json");
        let fields = FieldSet::from_names(["Customer", "Job No", "Grand Total"]);
        let items = sample_items();

        BatchFile::from_items(&fields, &items).save(&path).unwrap();
        let loaded = BatchFile::load(&path).unwrap();

        assert_eq!(loaded.field_set(), fields);
        let restored = loaded.to_items().unwrap();
        assert_eq!(restored[0].id(), items[0].id());
        assert_eq!(restored[1].error(), Some("timed out"));

        // Values come back in field order
        let names: Vec<&str> = restored[0].data().unwrap().iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Customer", "Job No", "Grand Total"]);
        assert_eq!(
            restored[0].data().unwrap().get("Grand Total"),
            Some(&FieldValue::Number(1250.5))
        );
    }

    #[test]
    fn test_unfinished_item_rejected() {
        let mut file = BatchFile::from_items(&FieldSet::from_names(["Customer"]), &sample_items());
        file.items[0].status = "processing".to_string();
        assert!(matches!(file.to_items(), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_bad_id_rejected() {
        let mut file = BatchFile::from_items(&FieldSet::from_names(["Customer"]), &sample_items());
        file.items[1].id = "nope".to_string();
        assert!(file.to_items().is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = BatchFile::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CliError::ReadFile { .. }));
    }
}
