//! Extracted field values and the ordered record that holds them

use indexmap::IndexMap;
use std::fmt;

/// A single extracted value
///
/// Extraction services return strings, numbers or an explicit null for fields
/// they could not find. Missing fields are always `Null`, never omitted.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Free text
    Text(String),

    /// Numeric value
    Number(f64),

    /// Field requested but not found
    Null,
}

impl FieldValue {
    /// Whether the value renders as nothing once trimmed
    ///
    /// # Examples
    ///
    /// ```
    /// use docket_domain::FieldValue;
    ///
    /// assert!(FieldValue::Null.is_blank());
    /// assert!(FieldValue::Text("  ".into()).is_blank());
    /// assert!(!FieldValue::Number(0.0).is_blank());
    /// ```
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(_) => false,
            FieldValue::Null => true,
        }
    }

    /// Whether this is an explicit null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            // f64 Display prints 100.0 as "100" and keeps fractional digits otherwise
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Null => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// An insertion-ordered mapping from field name to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, keeping the original position on replace
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(field.into(), value.into())
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Get the value for a field
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Get a mutable reference to a field's value
    pub fn get_mut(&mut self, field: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(field)
    }

    /// Display form of a field, or `None` if the field is absent or blank
    pub fn text(&self, field: &str) -> Option<String> {
        self.fields
            .get(field)
            .filter(|v| !v.is_blank())
            .map(|v| v.to_string())
    }

    /// Whether the record holds the field at all (nulls included)
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterate over `(field, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_display_drops_trailing_zero() {
        assert_eq!(FieldValue::Number(100.0).to_string(), "100");
        assert_eq!(FieldValue::Number(12.5).to_string(), "12.5");
    }

    #[test]
    fn test_null_displays_empty() {
        assert_eq!(FieldValue::Null.to_string(), "");
    }

    #[test]
    fn test_record_keeps_insertion_order() {
        let record = Record::new()
            .with("b", "2")
            .with("a", "1")
            .with("c", FieldValue::Null);

        let keys: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut record = Record::new().with("a", "1").with("b", "2");
        record.insert("a", "changed");

        let keys: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(record.text("a").as_deref(), Some("changed"));
    }

    #[test]
    fn test_text_skips_blank_values() {
        let record = Record::new()
            .with("empty", "   ")
            .with("null", FieldValue::Null)
            .with("value", "x");

        assert_eq!(record.text("empty"), None);
        assert_eq!(record.text("null"), None);
        assert_eq!(record.text("missing"), None);
        assert_eq!(record.text("value").as_deref(), Some("x"));
        assert!(record.contains("null"));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(FieldValue::from(None::<&str>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some(3.0)), FieldValue::Number(3.0));
    }
}
