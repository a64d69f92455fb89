//! Per-customer consolidation of extraction results

use crate::matcher::FieldMatcher;
use crate::ordered_set::OrderedSet;
use docket_domain::{ExtractionItem, FieldSet, ItemId, ItemStatus, Role};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::debug;

/// Customer value used when an item has none
pub const UNKNOWN_CUSTOMER: &str = "Unknown";

/// Grouping key for a raw customer value: trimmed and lower-cased
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// One summary row: every selected item sharing a customer key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    /// Normalized customer key, stable across repeated summaries
    pub key: String,
    /// Raw customer value of the first member seen
    pub customer_name: String,
    /// Distinct values per aggregated role, in first-seen order
    pub values: IndexMap<Role, OrderedSet>,
    /// Number of member items
    pub file_count: usize,
    /// Member item ids in input order
    pub member_ids: Vec<ItemId>,
}

impl GroupRecord {
    fn new(key: String, customer_name: String) -> Self {
        let values = Role::AGGREGATED
            .into_iter()
            .map(|role| (role, OrderedSet::new()))
            .collect();

        Self {
            key,
            customer_name,
            values,
            file_count: 0,
            member_ids: Vec::new(),
        }
    }

    /// Distinct values collected for a role
    pub fn role_values(&self, role: Role) -> Option<&OrderedSet> {
        self.values.get(&role)
    }

    /// Display string for a role
    ///
    /// Customer shows the group's name; every other role shows its joined
    /// values, or `"-"` when none were observed.
    pub fn display(&self, role: Role) -> String {
        match role {
            Role::Customer => self.customer_name.clone(),
            _ => self
                .values
                .get(&role)
                .map(OrderedSet::display)
                .unwrap_or_else(|| OrderedSet::new().display()),
        }
    }
}

/// Builds summary rows from a selection of completed items
pub struct GroupingEngine;

impl GroupingEngine {
    /// Group the selected successful items by customer
    ///
    /// Items outside `selection`, or not in `Success`, are skipped. Groups come
    /// out in the order their key was first seen. An empty result means there
    /// is nothing to show.
    pub fn summarize(
        items: &[ExtractionItem],
        selection: &HashSet<ItemId>,
        fields: &FieldSet,
    ) -> Vec<GroupRecord> {
        let roles = FieldMatcher::resolve_all(fields);
        let mut groups: IndexMap<String, GroupRecord> = IndexMap::new();

        let selected = items
            .iter()
            .filter(|item| selection.contains(&item.id()) && item.status() == ItemStatus::Success);

        for item in selected {
            let Some(data) = item.data() else {
                continue;
            };

            let raw_customer = roles
                .get(Role::Customer)
                .and_then(|field| data.text(field))
                .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string());
            let key = normalize_key(&raw_customer);

            let group = groups
                .entry(key.clone())
                .or_insert_with(|| GroupRecord::new(key, raw_customer));
            group.file_count += 1;
            group.member_ids.push(item.id());

            for role in Role::AGGREGATED {
                let Some(value) = roles.get(role).and_then(|field| data.text(field)) else {
                    continue;
                };
                if let Some(set) = group.values.get_mut(&role) {
                    set.insert(value);
                }
            }
        }

        debug!(
            selected = selection.len(),
            groups = groups.len(),
            "Summarized extraction items"
        );

        groups.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_domain::Record;

    fn fields() -> FieldSet {
        FieldSet::from_names(["Customer", "Job No", "Payment Terms", "Grand Total"])
    }

    fn success(customer: &str, job: &str, total: &str) -> ExtractionItem {
        ExtractionItem::restored(
            ItemId::new(),
            format!("{}.pdf", job),
            Ok(Record::new()
                .with("Customer", customer)
                .with("Job No", job)
                .with("Grand Total", total)),
        )
    }

    fn select_all(items: &[ExtractionItem]) -> HashSet<ItemId> {
        items.iter().map(|i| i.id()).collect()
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Acme Corp "), "acme corp");
        assert_eq!(normalize_key("ACME"), "acme");
    }

    #[test]
    fn test_groups_by_normalized_customer() {
        let items = vec![
            success("Acme Corp", "J1", "100"),
            success(" acme corp ", "J2", "200"),
            success("ACME CORP", "J3", "100"),
        ];
        let groups = GroupingEngine::summarize(&items, &select_all(&items), &fields());

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "acme corp");
        assert_eq!(groups[0].customer_name, "Acme Corp");
        assert_eq!(groups[0].display(Role::JobNumber), "J1, J2, J3");
        assert_eq!(groups[0].display(Role::GrandTotal), "100, 200");
        assert_eq!(groups[0].file_count, 3);
    }

    #[test]
    fn test_group_order_is_first_seen() {
        let items = vec![
            success("Zeta", "J1", "1"),
            success("Acme", "J2", "2"),
            success("zeta", "J3", "3"),
        ];
        let groups = GroupingEngine::summarize(&items, &select_all(&items), &fields());

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "acme"]);
        assert_eq!(groups[0].member_ids, vec![items[0].id(), items[2].id()]);
    }

    #[test]
    fn test_unselected_and_failed_items_are_skipped() {
        let kept = success("Acme", "J1", "100");
        let unselected = success("Globex", "J2", "200");
        let mut failed = ExtractionItem::pending("bad.pdf");
        failed.begin_processing();
        failed.complete_error("unreadable");
        let pending = ExtractionItem::pending("later.pdf");

        let selection: HashSet<ItemId> = [kept.id(), failed.id(), pending.id()].into_iter().collect();
        let items = vec![kept, unselected, failed, pending];
        let groups = GroupingEngine::summarize(&items, &selection, &fields());

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].customer_name, "Acme");
        assert_eq!(groups[0].file_count, 1);
    }

    #[test]
    fn test_empty_selection_yields_nothing() {
        let items = vec![success("Acme", "J1", "100")];
        let groups = GroupingEngine::summarize(&items, &HashSet::new(), &fields());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_missing_customer_is_unknown() {
        let blank = success("   ", "J1", "100");
        let absent = ExtractionItem::restored(
            ItemId::new(),
            "absent.pdf",
            Ok(Record::new().with("Customer", None::<String>).with("Job No", "J2")),
        );
        let items = vec![blank, absent];
        let groups = GroupingEngine::summarize(&items, &select_all(&items), &fields());

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "unknown");
        assert_eq!(groups[0].customer_name, UNKNOWN_CUSTOMER);
        assert_eq!(groups[0].file_count, 2);
    }

    #[test]
    fn test_blank_and_null_values_are_not_collected() {
        let items = vec![ExtractionItem::restored(
            ItemId::new(),
            "a.pdf",
            Ok(Record::new()
                .with("Customer", "Acme")
                .with("Job No", "  ")
                .with("Payment Terms", None::<String>)),
        )];
        let groups = GroupingEngine::summarize(&items, &select_all(&items), &fields());

        assert_eq!(groups[0].display(Role::JobNumber), "-");
        assert_eq!(groups[0].display(Role::PaymentTerms), "-");
        assert!(groups[0].role_values(Role::JobNumber).unwrap().is_empty());
    }

    #[test]
    fn test_numeric_values_use_display_form() {
        let items = vec![ExtractionItem::restored(
            ItemId::new(),
            "a.pdf",
            Ok(Record::new().with("Customer", "Acme").with("Grand Total", 1250.5)),
        )];
        let groups = GroupingEngine::summarize(&items, &select_all(&items), &fields());
        assert_eq!(groups[0].display(Role::GrandTotal), "1250.5");
    }

    #[test]
    fn test_unresolved_roles_display_dash() {
        let fields = FieldSet::from_names(["Customer", "Grand Total"]);
        let items = vec![success("Acme", "J1", "100")];
        let groups = GroupingEngine::summarize(&items, &select_all(&items), &fields);

        assert_eq!(groups[0].display(Role::JobNumber), "-");
        assert_eq!(groups[0].display(Role::AdvanceTotal), "-");
        assert_eq!(groups[0].display(Role::InvoiceDate), "-");
    }

    #[test]
    fn test_customer_fallback_groups_by_first_field() {
        let fields = FieldSet::from_names(["Vendor", "Grand Total"]);
        let items = vec![ExtractionItem::restored(
            ItemId::new(),
            "a.pdf",
            Ok(Record::new().with("Vendor", "Initech").with("Grand Total", "5")),
        )];
        let groups = GroupingEngine::summarize(&items, &select_all(&items), &fields);

        assert_eq!(groups[0].customer_name, "Initech");
        assert_eq!(groups[0].display(Role::GrandTotal), "5");
    }

    #[test]
    fn test_edited_value_shows_in_next_summary() {
        let mut items = vec![success("Acme", "J1", "100")];
        let selection = select_all(&items);
        let before = GroupingEngine::summarize(&items, &selection, &fields());

        items[0].set_value("Grand Total", "120".into()).unwrap();
        let after = GroupingEngine::summarize(&items, &selection, &fields());

        assert_eq!(before[0].display(Role::GrandTotal), "100");
        assert_eq!(after[0].display(Role::GrandTotal), "120");
        assert_eq!(before[0].key, after[0].key);
    }
}
