//! Audit capability and the built-in audits
//!
//! Architecture: Capability Interface - Audits are independent implementations of one trait
//! - meta() describes the audit for registries, run() turns artifacts into a result
//! - Shared table helpers are free functions rather than inherited members

pub mod largest_contentful_paint_node;

pub use largest_contentful_paint_node::LargestContentfulPaintNode;

use crate::domain::artifacts::Artifacts;
use crate::domain::audit::{
    AuditMeta, AuditOutcome, AuditResult, ItemValueType, ReportTable, TableHeading, TableRow,
};
use crate::i18n::{MessageCatalog, UiStrings};

/// A diagnostic check over gathered artifacts
pub trait Audit: Send + Sync {
    /// Static description, localized through the catalog
    fn meta(&self, catalog: &dyn MessageCatalog) -> AuditMeta;

    /// Produce the audit result from the artifacts
    ///
    /// Only precondition failures on required artifacts are reported as errors.
    fn run(&self, artifacts: &Artifacts, catalog: &dyn MessageCatalog) -> AuditOutcome<AuditResult>;
}

static BUILTIN_UI_STRINGS: [UiStrings; 1] = [largest_contentful_paint_node::UI_STRINGS];

/// UI strings of every built-in audit
pub fn builtin_ui_strings() -> &'static [UiStrings] {
    &BUILTIN_UI_STRINGS
}

/// Every built-in audit, in registration order
pub fn builtin_audits() -> Vec<Box<dyn Audit>> {
    vec![Box::new(LargestContentfulPaintNode)]
}

/// Heading for a column of element references
pub fn node_heading(key: impl Into<String>, text: impl Into<String>) -> TableHeading {
    TableHeading {
        key: key.into(),
        item_type: ItemValueType::Node,
        text: text.into(),
    }
}

/// Assemble a details table from headings and rows
pub fn make_table_details(headings: Vec<TableHeading>, items: Vec<TableRow>) -> ReportTable {
    ReportTable::new(headings, items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LocaleCatalog;

    #[test]
    fn test_builtin_registry() {
        let catalog = LocaleCatalog::english();
        let ids: Vec<String> = builtin_audits()
            .iter()
            .map(|audit| audit.meta(&catalog).id)
            .collect();

        assert_eq!(ids, vec!["largest-contentful-paint-node".to_string()]);
        assert_eq!(builtin_ui_strings().len(), 1);
    }

    #[test]
    fn test_make_table_details_keeps_empty_rows() {
        let table = make_table_details(vec![node_heading("node", "Element")], Vec::new());

        assert_eq!(table.headings.len(), 1);
        assert!(table.is_empty());
    }
}
