//! Insertion-ordered string set

use indexmap::IndexSet;

/// Placeholder shown for a role with no observed values
pub const EMPTY_DISPLAY: &str = "-";

/// A set of strings that remembers first-insertion order
///
/// Deduplication is exact string equality; nothing is trimmed or case-folded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedSet {
    values: IndexSet<String>,
}

impl OrderedSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value; returns `false` if it was already present
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        self.values.insert(value.into())
    }

    /// Whether the value is present
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    /// Values in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value has been added
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `", "`-joined values, or `"-"` when empty
    ///
    /// # Examples
    ///
    /// ```
    /// use docket_summary::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// assert_eq!(set.display(), "-");
    ///
    /// set.insert("J2");
    /// set.insert("J1");
    /// set.insert("J2");
    /// assert_eq!(set.display(), "J2, J1");
    /// ```
    pub fn display(&self) -> String {
        if self.values.is_empty() {
            EMPTY_DISPLAY.to_string()
        } else {
            self.iter().collect::<Vec<_>>().join(", ")
        }
    }
}
