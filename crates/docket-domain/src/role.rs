//! Role module - semantic categories the grouping engine understands

use std::fmt;

/// A fixed semantic role, independent of what the user named their fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// The billed party; drives grouping
    Customer,

    /// Job or work-order number
    JobNumber,

    /// Advance or deposit amount
    AdvanceTotal,

    /// Payment terms
    PaymentTerms,

    /// Invoice date
    InvoiceDate,

    /// Grand total amount
    GrandTotal,
}

impl Role {
    /// All roles in display order
    pub const ALL: [Role; 6] = [
        Role::Customer,
        Role::JobNumber,
        Role::AdvanceTotal,
        Role::PaymentTerms,
        Role::InvoiceDate,
        Role::GrandTotal,
    ];

    /// Roles aggregated as value sets (everything except Customer)
    pub const AGGREGATED: [Role; 5] = [
        Role::JobNumber,
        Role::AdvanceTotal,
        Role::PaymentTerms,
        Role::InvoiceDate,
        Role::GrandTotal,
    ];

    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::JobNumber => "job_number",
            Role::AdvanceTotal => "advance_total",
            Role::PaymentTerms => "payment_terms",
            Role::InvoiceDate => "invoice_date",
            Role::GrandTotal => "grand_total",
        }
    }

    /// Human-readable column heading
    pub fn label(&self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::JobNumber => "Job Numbers",
            Role::AdvanceTotal => "Advance Total",
            Role::PaymentTerms => "Payment Terms",
            Role::InvoiceDate => "Invoice Date",
            Role::GrandTotal => "Grand Total",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
