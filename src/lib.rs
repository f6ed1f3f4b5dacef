//! LCP Node Audit - Surfaces the Largest Contentful Paint element as a localized report entry
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Pure domain values separated from catalog files, configuration and output formats
//! - Audits are injected with their message catalog instead of reading global state
//! - The runner isolates audit failures so siblings keep reporting

pub mod audits;
pub mod config;
pub mod domain;
pub mod i18n;
pub mod report;
pub mod runner;

// Re-export main types for convenient access
pub use domain::artifacts::{Artifacts, ElementRecord, ELEMENT_RECORDS};
pub use domain::audit::{
    AuditError, AuditMeta, AuditOutcome, AuditResult, NodeReference, ReportTable,
    ScoreDisplayMode, TableHeading, TableRow,
};

pub use audits::largest_contentful_paint_node::{
    assemble, build_table, format_summary, locate, LargestContentfulPaintNode,
};
pub use audits::Audit;

pub use config::{AuditConfig, ConfigBuilder};

pub use i18n::{LocaleCatalog, MessageCatalog, MessageParams};

pub use report::{OutputFormat, ReportFormatter};

pub use runner::{AuditEntry, AuditRunner, RunOptions, RunReport};

use std::path::Path;

/// Runner built from a configuration
pub fn runner_from_config(config: &AuditConfig) -> AuditOutcome<AuditRunner> {
    let catalog = config.load_catalog()?;
    Ok(AuditRunner::new(Box::new(catalog)))
}

/// Run the LCP node audit over element records with English strings
pub fn audit_element_records(records: &[ElementRecord]) -> AuditResult {
    assemble(records, &LocaleCatalog::english())
}

/// Run every built-in audit over an artifacts JSON file
pub fn run_artifacts_file<P: AsRef<Path>>(
    path: P,
    config: &AuditConfig,
) -> AuditOutcome<RunReport> {
    let contents = std::fs::read_to_string(&path)?;
    let artifacts = Artifacts::from_json(&contents)?;

    let runner = runner_from_config(config)?;
    let options = RunOptions {
        parallel: config.output.parallel,
    };

    tracing::debug!(
        "Running audits over {} (artifacts: {})",
        path.as_ref().display(),
        artifacts.names().collect::<Vec<_>>().join(", ")
    );
    Ok(runner.run(&artifacts, &options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record(tag: &str, suffix: &str) -> ElementRecord {
        ElementRecord::new(tag)
            .with_path(format!("p{suffix}"))
            .with_selector(format!("s{suffix}"))
            .with_label(format!("n{suffix}"))
            .with_snippet(format!("sn{suffix}"))
    }

    #[test]
    fn test_scenario_empty_input() {
        let result = audit_element_records(&[]);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["score"], 1);
        assert!(serde_json::to_string(&result).unwrap().contains(r#""score":1,"#));
        assert_eq!(json["displayValue"], "0 elements found");
        assert_eq!(json["details"]["items"], serde_json::json!([]));
    }

    #[test]
    fn test_scenario_second_record_matches() {
        let records = vec![ElementRecord::new("other"), record("largest-contentful-paint", "2")];
        let result = audit_element_records(&records);

        assert_eq!(result.display_value, "1 element found");
        assert_eq!(result.details.items.len(), 1);
        let node = &result.details.items[0].node;
        assert_eq!(
            (node.path.as_str(), node.selector.as_str(), node.node_label.as_str(), node.snippet.as_str()),
            ("p2", "s2", "n2", "sn2")
        );
    }

    #[test]
    fn test_scenario_duplicate_tags() {
        let records = vec![
            record("largest-contentful-paint", "1"),
            record("largest-contentful-paint", "2"),
        ];
        let result = audit_element_records(&records);

        assert_eq!(result.details.items.len(), 1);
        assert_eq!(result.details.items[0].node.path, "p1");
        assert_eq!(result.display_value, "1 element found");
    }

    #[test]
    fn test_run_artifacts_file() {
        let temp_dir = TempDir::new().unwrap();
        let artifacts_path = temp_dir.path().join("artifacts.json");
        fs::write(
            &artifacts_path,
            r#"{"ElementRecords": [{
                "metricTag": "largest-contentful-paint",
                "nodePath": "1,HTML,1,BODY",
                "selector": "body > img",
                "nodeLabel": "hero.png",
                "snippet": "<img src=hero.png>"
            }]}"#,
        )
        .unwrap();

        let report = run_artifacts_file(&artifacts_path, &AuditConfig::default()).unwrap();
        let entry = report.entry("largest-contentful-paint-node").unwrap();

        assert_eq!(entry.display_value.as_deref(), Some("1 element found"));
        assert_eq!(entry.details.as_ref().unwrap().items[0].node.selector, "body > img");
    }

    #[test]
    fn test_run_artifacts_file_without_records() {
        let temp_dir = TempDir::new().unwrap();
        let artifacts_path = temp_dir.path().join("artifacts.json");
        fs::write(&artifacts_path, r#"{"Screenshot": "data"}"#).unwrap();

        let report = run_artifacts_file(&artifacts_path, &AuditConfig::default()).unwrap();
        assert!(report.has_errors());
    }

    #[test]
    fn test_run_artifacts_file_unreadable() {
        let err = run_artifacts_file("/nonexistent/artifacts.json", &AuditConfig::default())
            .unwrap_err();
        assert!(matches!(err, AuditError::Io { .. }));
    }
}
