//! ExtractionItem - one document's progress through a batch

use crate::record::{FieldValue, Record};
use std::fmt;

/// Unique identifier for an extraction item based on UUIDv7
///
/// Items created in sequence sort in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u128);

impl ItemId {
    /// Generate a new UUIDv7-based ItemId
    ///
    /// # Examples
    ///
    /// ```
    /// use docket_domain::ItemId;
    ///
    /// let id = ItemId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an ItemId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an ItemId from its hyphenated string form
    ///
    /// # Examples
    ///
    /// ```
    /// use docket_domain::ItemId;
    ///
    /// let id = ItemId::new();
    /// let parsed = ItemId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid item id '{}': {}", s, e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Processing status of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemStatus {
    /// Waiting for its turn
    Pending,

    /// Extraction call in flight
    Processing,

    /// Extraction returned a record
    Success,

    /// Extraction failed
    Error,
}

impl ItemStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Processing => "processing",
            ItemStatus::Success => "success",
            ItemStatus::Error => "error",
        }
    }

    /// Parse a status from its name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ItemStatus::Pending),
            "processing" => Some(ItemStatus::Processing),
            "success" => Some(ItemStatus::Success),
            "error" => Some(ItemStatus::Error),
            _ => None,
        }
    }

    /// Whether the item has finished for this batch
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Success | ItemStatus::Error)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected post-hoc edit of an item's data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemEditError {
    /// The item has no data to edit (it is not in `Success`)
    NoData {
        /// Current status of the item
        status: ItemStatus,
    },
}

impl fmt::Display for ItemEditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemEditError::NoData { status } => {
                write!(f, "item has no data to edit (status: {})", status)
            }
        }
    }
}

impl std::error::Error for ItemEditError {}

/// One document's processing record within a batch
///
/// `data` is present exactly when the status is `Success` and `error` exactly
/// when it is `Error`. Fields are private so those pairings can only change
/// through the transition methods below.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionItem {
    id: ItemId,
    file_name: String,
    status: ItemStatus,
    data: Option<Record>,
    error: Option<String>,
}

impl ExtractionItem {
    /// Create a pending item with a fresh id
    pub fn pending(file_name: impl Into<String>) -> Self {
        Self::pending_with_id(ItemId::new(), file_name)
    }

    /// Create a pending item with a known id
    pub fn pending_with_id(id: ItemId, file_name: impl Into<String>) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            status: ItemStatus::Pending,
            data: None,
            error: None,
        }
    }

    /// Rebuild a finished item, e.g. when loading a saved batch
    pub fn restored(id: ItemId, file_name: impl Into<String>, outcome: Result<Record, String>) -> Self {
        let mut item = Self::pending_with_id(id, file_name);
        match outcome {
            Ok(record) => item.complete_success(record),
            Err(message) => item.complete_error(message),
        }
        item
    }

    /// Item identifier
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Source file name
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Current status
    pub fn status(&self) -> ItemStatus {
        self.status
    }

    /// Extracted record (only in `Success`)
    pub fn data(&self) -> Option<&Record> {
        self.data.as_ref()
    }

    /// Failure message (only in `Error`)
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Mark the extraction call as in flight
    pub fn begin_processing(&mut self) {
        self.status = ItemStatus::Processing;
        self.data = None;
        self.error = None;
    }

    /// Commit a successful extraction
    pub fn complete_success(&mut self, record: Record) {
        self.status = ItemStatus::Success;
        self.data = Some(record);
        self.error = None;
    }

    /// Commit a failed extraction
    pub fn complete_error(&mut self, message: impl Into<String>) {
        self.status = ItemStatus::Error;
        self.data = None;
        self.error = Some(message.into());
    }

    /// Edit one extracted value without touching the status
    ///
    /// Fields not yet present are appended to the record.
    pub fn set_value(&mut self, field: &str, value: FieldValue) -> Result<(), ItemEditError> {
        let status = self.status;
        let data = self.data.as_mut().ok_or(ItemEditError::NoData { status })?;
        data.insert(field, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_ordering() {
        let id1 = ItemId::from_value(1000);
        let id2 = ItemId::from_value(2000);
        assert!(id1 < id2);
    }

    #[test]
    fn test_item_id_display_and_parse() {
        let id = ItemId::new();
        let id_str = id.to_string();
        assert_eq!(id_str.len(), 36);
        assert_eq!(ItemId::from_string(&id_str).unwrap(), id);
        assert!(ItemId::from_string("not-an-id").is_err());
    }

    #[test]
    fn test_pending_item_has_no_payload() {
        let item = ExtractionItem::pending("a.pdf");
        assert_eq!(item.status(), ItemStatus::Pending);
        assert!(item.data().is_none());
        assert!(item.error().is_none());
    }

    #[test]
    fn test_success_sets_data_only() {
        let mut item = ExtractionItem::pending("a.pdf");
        item.begin_processing();
        assert_eq!(item.status(), ItemStatus::Processing);

        item.complete_success(Record::new().with("Customer", "Acme"));
        assert_eq!(item.status(), ItemStatus::Success);
        assert!(item.data().is_some());
        assert!(item.error().is_none());
    }

    #[test]
    fn test_error_sets_message_only() {
        let mut item = ExtractionItem::pending("a.pdf");
        item.begin_processing();
        item.complete_error("boom");
        assert_eq!(item.status(), ItemStatus::Error);
        assert!(item.data().is_none());
        assert_eq!(item.error(), Some("boom"));
    }

    #[test]
    fn test_set_value_keeps_status() {
        let mut item = ExtractionItem::restored(
            ItemId::new(),
            "a.pdf",
            Ok(Record::new().with("Customer", FieldValue::Null)),
        );
        item.set_value("Customer", FieldValue::from("Acme")).unwrap();
        assert_eq!(item.status(), ItemStatus::Success);
        assert_eq!(item.data().unwrap().text("Customer").as_deref(), Some("Acme"));
    }

    #[test]
    fn test_set_value_rejected_without_data() {
        let mut item = ExtractionItem::restored(ItemId::new(), "a.pdf", Err("bad".into()));
        let result = item.set_value("Customer", FieldValue::from("Acme"));
        assert_eq!(result, Err(ItemEditError::NoData { status: ItemStatus::Error }));
        assert_eq!(item.status(), ItemStatus::Error);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ItemStatus::parse("Success"), Some(ItemStatus::Success));
        assert_eq!(ItemStatus::parse("ERROR"), Some(ItemStatus::Error));
        assert!(ItemStatus::parse("done").is_none());
        assert!(ItemStatus::Success.is_terminal());
        assert!(!ItemStatus::Processing.is_terminal());
    }
}
