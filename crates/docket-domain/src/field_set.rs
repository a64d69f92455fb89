//! The user's ordered list of field names
//!
//! Order matters twice: it is the order fields are requested from the
//! extraction service and the default column order for display and export.

use std::collections::HashSet;
use std::fmt;

/// Errors from FieldSet mutations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSetError {
    /// Field name is empty or whitespace
    Blank,

    /// Field name already present (exact, case-sensitive match)
    Duplicate(String),

    /// Field name not present
    NotFound(String),

    /// Proposed order is not a permutation of the current fields
    NotAPermutation,
}

impl fmt::Display for FieldSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSetError::Blank => write!(f, "field name cannot be blank"),
            FieldSetError::Duplicate(name) => write!(f, "field '{}' already exists", name),
            FieldSetError::NotFound(name) => write!(f, "field '{}' does not exist", name),
            FieldSetError::NotAPermutation => {
                write!(f, "new order must contain exactly the existing fields")
            }
        }
    }
}

impl std::error::Error for FieldSetError {}

/// An ordered sequence of pairwise-distinct field names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    names: Vec<String>,
}

impl FieldSet {
    /// Create an empty field set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a field set, silently skipping blanks and duplicates
    ///
    /// # Examples
    ///
    /// ```
    /// use docket_domain::FieldSet;
    ///
    /// let fields = FieldSet::from_names(["Customer", "Job No", "Customer", " "]);
    /// assert_eq!(fields.names(), &["Customer".to_string(), "Job No".to_string()]);
    /// ```
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for name in names {
            let _ = set.add(name);
        }
        set
    }

    /// Append a field name
    ///
    /// The name is trimmed first. Blank names and names already present are
    /// rejected and leave the set unchanged.
    pub fn add(&mut self, name: impl Into<String>) -> Result<(), FieldSetError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(FieldSetError::Blank);
        }
        if self.contains(&name) {
            return Err(FieldSetError::Duplicate(name));
        }
        self.names.push(name);
        Ok(())
    }

    /// Remove a field name
    pub fn remove(&mut self, name: &str) -> Result<(), FieldSetError> {
        let idx = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| FieldSetError::NotFound(name.to_string()))?;
        self.names.remove(idx);
        Ok(())
    }

    /// Replace the order of the fields
    ///
    /// `new_order` must name every existing field exactly once.
    pub fn reorder<S: AsRef<str>>(&mut self, new_order: &[S]) -> Result<(), FieldSetError> {
        if new_order.len() != self.names.len() {
            return Err(FieldSetError::NotAPermutation);
        }

        let current: HashSet<&str> = self.names.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        for name in new_order {
            let name = name.as_ref();
            if !current.contains(name) || !seen.insert(name) {
                return Err(FieldSetError::NotAPermutation);
            }
        }

        self.names = new_order.iter().map(|n| n.as_ref().to_string()).collect();
        Ok(())
    }

    /// Whether a name is present
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// The first field, if any
    pub fn first(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    /// All names in order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate over names in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the set has no fields
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rejects_duplicates_and_blanks() {
        let mut fields = FieldSet::new();
        assert!(fields.add("Customer").is_ok());
        assert_eq!(
            fields.add("Customer"),
            Err(FieldSetError::Duplicate("Customer".to_string()))
        );
        assert_eq!(fields.add("   "), Err(FieldSetError::Blank));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_duplicates_are_case_sensitive() {
        let mut fields = FieldSet::new();
        fields.add("Customer").unwrap();
        assert!(fields.add("customer").is_ok());
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_add_trims_names() {
        let mut fields = FieldSet::new();
        fields.add("  Job No ").unwrap();
        assert_eq!(fields.first(), Some("Job No"));
        assert!(fields.add("Job No").is_err());
    }

    #[test]
    fn test_remove() {
        let mut fields = FieldSet::from_names(["a", "b", "c"]);
        fields.remove("b").unwrap();
        assert_eq!(fields.names(), &["a".to_string(), "c".to_string()]);
        assert_eq!(fields.remove("b"), Err(FieldSetError::NotFound("b".to_string())));
    }

    #[test]
    fn test_reorder_accepts_permutation() {
        let mut fields = FieldSet::from_names(["a", "b", "c"]);
        fields.reorder(&["c", "a", "b"]).unwrap();
        let order: Vec<&str> = fields.iter().collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_reorder_rejects_non_permutations() {
        let mut fields = FieldSet::from_names(["a", "b", "c"]);
        assert_eq!(fields.reorder(&["a", "b"]), Err(FieldSetError::NotAPermutation));
        assert_eq!(fields.reorder(&["a", "b", "b"]), Err(FieldSetError::NotAPermutation));
        assert_eq!(fields.reorder(&["a", "b", "d"]), Err(FieldSetError::NotAPermutation));

        // Unchanged after rejected reorders
        let order: Vec<&str> = fields.iter().collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }
}
