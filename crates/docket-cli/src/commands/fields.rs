//! Fields command implementation.

use crate::batch::BatchFile;
use crate::cli::FieldsArgs;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use docket_domain::FieldSet;
use docket_summary::FieldMatcher;

/// Execute the fields command.
///
/// Without edits this only shows how the batch's fields map onto roles.
pub async fn execute_fields(args: FieldsArgs, formatter: &Formatter) -> Result<()> {
    let mut batch = BatchFile::load(&args.batch)?;
    let mut fields = batch.field_set();

    let changed = edit_fields(&mut fields, &args.add, &args.remove, args.order.as_deref())?;
    if changed {
        batch.fields = fields.names().to_vec();
        batch.save(&args.batch)?;
        if formatter.format() == OutputFormat::Table {
            println!("{}", formatter.success(&format!("Updated fields in {}", args.batch.display())));
        }
    }

    let roles = FieldMatcher::resolve_all(&fields);
    println!("{}", formatter.format_roles(&roles, &fields)?);
    Ok(())
}

/// Apply removals, then additions, then the new order.
///
/// Returns whether anything was requested. The first rejected change aborts
/// the whole edit.
pub fn edit_fields(
    fields: &mut FieldSet,
    add: &[String],
    remove: &[String],
    order: Option<&[String]>,
) -> Result<bool> {
    let mut edited = fields.clone();

    for name in remove {
        edited.remove(name)?;
    }
    for name in add {
        edited.add(name.as_str())?;
    }
    if let Some(order) = order {
        edited.reorder(order)?;
    }

    let changed = !add.is_empty() || !remove.is_empty() || order.is_some();
    *fields = edited;
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use docket_domain::FieldSetError;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_edits() {
        let mut fields = FieldSet::from_names(["Customer"]);
        assert!(!edit_fields(&mut fields, &[], &[], None).unwrap());
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_add_remove_reorder() {
        let mut fields = FieldSet::from_names(["Customer", "Notes", "Grand Total"]);
        let order = strings(&["Job No", "Customer", "Grand Total"]);

        let changed = edit_fields(
            &mut fields,
            &strings(&["Job No"]),
            &strings(&["Notes"]),
            Some(&order),
        )
        .unwrap();

        assert!(changed);
        assert_eq!(fields.names(), order.as_slice());
    }

    #[test]
    fn test_rejected_edit_leaves_fields_untouched() {
        let mut fields = FieldSet::from_names(["Customer", "Grand Total"]);
        let err = edit_fields(&mut fields, &strings(&["Job No", "Customer"]), &[], None).unwrap_err();

        assert!(matches!(err, CliError::Fields(FieldSetError::Duplicate(_))));
        assert_eq!(fields.names(), strings(&["Customer", "Grand Total"]).as_slice());
    }

    #[test]
    fn test_bad_order_rejected() {
        let mut fields = FieldSet::from_names(["Customer", "Grand Total"]);
        let order = strings(&["Customer"]);
        assert!(edit_fields(&mut fields, &[], &[], Some(&order)).is_err());
    }
}
