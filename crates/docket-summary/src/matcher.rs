//! Role resolution for user-named fields
//!
//! Each role owns an ordered list of patterns matched against the lower-cased
//! field name. Patterns are tried in priority order; for each pattern the
//! fields are scanned in FieldSet order and the first hit wins. Only the
//! Customer role falls back (to the first field) when nothing matches.

use docket_domain::{FieldSet, Role};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static ROLE_PATTERNS: LazyLock<Vec<(Role, Vec<Regex>)>> = LazyLock::new(|| {
    let table: [(Role, &[&str]); 6] = [
        (Role::Customer, &[r"customer", r"name", r"client"]),
        (
            Role::JobNumber,
            &[r"job", r"work\s*order", r"project\s*(no|num|number|#|id)"],
        ),
        (
            Role::AdvanceTotal,
            &[r"advance", r"deposit", r"down\s*payment", r"prepa(id|yment)"],
        ),
        (Role::PaymentTerms, &[r"payment\s*terms?", r"terms", r"due\s*in"]),
        (
            Role::InvoiceDate,
            &[r"invoice\s*date", r"(bill|issue)\s*date", r"date"],
        ),
        (
            Role::GrandTotal,
            &[r"grand\s*total", r"^total", r"total\s*(amount|due)", r"amount\s*due"],
        ),
    ];

    table
        .into_iter()
        .map(|(role, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| Regex::new(p).expect("static role pattern"))
                .collect();
            (role, compiled)
        })
        .collect()
});

/// Resolves fields to roles using the priority pattern table
pub struct FieldMatcher;

impl FieldMatcher {
    /// Resolve one role against the field set
    ///
    /// # Examples
    ///
    /// ```
    /// use docket_domain::{FieldSet, Role};
    /// use docket_summary::FieldMatcher;
    ///
    /// let fields = FieldSet::from_names(["Bill To", "Client Name", "Job #"]);
    /// // "name" outranks "client", and "Client Name" is the first field matching it
    /// assert_eq!(FieldMatcher::resolve(&fields, Role::Customer), Some("Client Name"));
    /// assert_eq!(FieldMatcher::resolve(&fields, Role::JobNumber), Some("Job #"));
    /// assert_eq!(FieldMatcher::resolve(&fields, Role::GrandTotal), None);
    /// ```
    pub fn resolve(fields: &FieldSet, role: Role) -> Option<&str> {
        let folded: Vec<(String, &str)> = fields.iter().map(|f| (f.to_lowercase(), f)).collect();

        let matched = Self::patterns(role).iter().find_map(|pattern| {
            folded
                .iter()
                .find(|(lower, _)| pattern.is_match(lower))
                .map(|(_, original)| *original)
        });

        match (matched, role) {
            (Some(field), _) => Some(field),
            (None, Role::Customer) => fields.first(),
            (None, _) => None,
        }
    }

    /// Resolve all roles at once
    pub fn resolve_all(fields: &FieldSet) -> ResolvedRoles {
        let fields_by_role = Role::ALL
            .iter()
            .filter_map(|&role| Self::resolve(fields, role).map(|f| (role, f.to_string())))
            .collect();
        ResolvedRoles { fields_by_role }
    }

    /// Pattern sources for a role, highest priority first
    pub fn pattern_sources(role: Role) -> Vec<&'static str> {
        Self::patterns(role).iter().map(Regex::as_str).collect()
    }

    fn patterns(role: Role) -> &'static [Regex] {
        ROLE_PATTERNS
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, patterns)| patterns.as_slice())
            .unwrap_or(&[])
    }
}

/// The field chosen for each role, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRoles {
    fields_by_role: HashMap<Role, String>,
}

impl ResolvedRoles {
    /// Field resolved for the role
    pub fn get(&self, role: Role) -> Option<&str> {
        self.fields_by_role.get(&role).map(String::as_str)
    }

    /// `(role, field)` pairs in role display order, resolved roles only
    pub fn iter(&self) -> impl Iterator<Item = (Role, &str)> {
        Role::ALL
            .into_iter()
            .filter_map(|role| self.get(role).map(|field| (role, field)))
    }
}
