//! Largest Contentful Paint element audit
//!
//! Surfaces the element that tracing identified as the Largest Contentful Paint.
//! The audit is informative: its score is always 1, whether or not an element
//! was found.

use crate::audits::{make_table_details, node_heading, Audit};
use crate::domain::artifacts::{Artifacts, ElementRecord, ELEMENT_RECORDS};
use crate::domain::audit::{
    AuditMeta, AuditOutcome, AuditResult, ItemValueType, NodeReference, ReportTable,
    ScoreDisplayMode, TableRow,
};
use crate::i18n::{MessageCatalog, MessageParams, UiStrings};

/// Audit identifier
pub const AUDIT_ID: &str = "largest-contentful-paint-node";

/// Metric tag carried by the LCP element record
pub const LCP_METRIC_TAG: &str = "largest-contentful-paint";

/// Template keys
pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const DISPLAY_VALUE: &str = "displayValue";
pub const COLUMN_HEADER: &str = "columnHeader";

/// English defaults for this audit's strings
pub const UI_STRINGS: UiStrings = UiStrings {
    namespace: AUDIT_ID,
    entries: &[
        (TITLE, "Largest Contentful Paint element"),
        (
            DESCRIPTION,
            "This is the element that was identified as the Largest Contentful Paint. \
             [Learn More](https://web.dev/lighthouse-largest-contentful-paint)",
        ),
        (
            DISPLAY_VALUE,
            "{itemCount, plural,
    =1 {1 element found}
    other {# elements found}
    }",
        ),
        (COLUMN_HEADER, "Element"),
    ],
};

/// Find the first record tagged as the LCP element
///
/// Records are scanned in order; any later record with the same tag is ignored.
pub fn locate(records: &[ElementRecord]) -> Option<&ElementRecord> {
    let found = records
        .iter()
        .position(|record| record.metric_tag == LCP_METRIC_TAG);

    tracing::debug!(
        "LCP element lookup over {} records: {:?}",
        records.len(),
        found
    );

    found.map(|index| &records[index])
}

/// Copy a record into a node reference, field for field
pub fn node_reference(record: &ElementRecord) -> NodeReference {
    NodeReference {
        kind: ItemValueType::Node,
        path: record.node_path.clone(),
        selector: record.selector.clone(),
        node_label: record.node_label.clone(),
        snippet: record.snippet.clone(),
    }
}

/// Build the single-column element table
pub fn build_table(lcp_record: Option<&ElementRecord>, catalog: &dyn MessageCatalog) -> ReportTable {
    let headings = vec![node_heading(
        "node",
        catalog.lookup(&UI_STRINGS.id(COLUMN_HEADER), &MessageParams::new()),
    )];

    let items = lcp_record
        .map(|record| TableRow {
            node: node_reference(record),
        })
        .into_iter()
        .collect();

    make_table_details(headings, items)
}

/// Pluralized summary, e.g. `1 element found`
pub fn format_summary(item_count: usize, catalog: &dyn MessageCatalog) -> String {
    let params = MessageParams::new().with_count("itemCount", item_count as u64);
    catalog.lookup(&UI_STRINGS.id(DISPLAY_VALUE), &params)
}

/// Turn the record collection into the audit result
pub fn assemble(records: &[ElementRecord], catalog: &dyn MessageCatalog) -> AuditResult {
    let details = build_table(locate(records), catalog);
    let display_value = format_summary(details.row_count(), catalog);

    AuditResult {
        score: 1.0,
        display_value,
        details,
    }
}

/// Audit surfacing the Largest Contentful Paint element
#[derive(Debug, Clone, Copy, Default)]
pub struct LargestContentfulPaintNode;

impl Audit for LargestContentfulPaintNode {
    fn meta(&self, catalog: &dyn MessageCatalog) -> AuditMeta {
        let params = MessageParams::new();
        AuditMeta {
            id: AUDIT_ID.to_string(),
            title: catalog.lookup(&UI_STRINGS.id(TITLE), &params),
            description: catalog.lookup(&UI_STRINGS.id(DESCRIPTION), &params),
            score_display_mode: ScoreDisplayMode::Informative,
            required_artifacts: vec![ELEMENT_RECORDS.to_string()],
        }
    }

    fn run(&self, artifacts: &Artifacts, catalog: &dyn MessageCatalog) -> AuditOutcome<AuditResult> {
        let records = artifacts.element_records()?;
        Ok(assemble(&records, catalog))
    }
}
