//! Audit runner
//!
//! Architecture: Domain Services - The runner orchestrates audits over one artifact set
//! - Checks each audit's declared artifacts before invoking it
//! - Isolates failures so one broken audit never hides the others
//! - Collects entries in registration order regardless of execution order

use crate::audits::{builtin_audits, Audit};
use crate::domain::artifacts::Artifacts;
use crate::domain::audit::{
    serialize_optional_score, AuditError, AuditMeta, AuditOutcome, AuditResult, ReportTable,
    ScoreDisplayMode,
};
use crate::i18n::{LocaleCatalog, MessageCatalog};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Options for customizing a run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Whether to run audits in parallel
    pub parallel: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Report entry for one audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub score_display_mode: ScoreDisplayMode,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_score"
    )]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ReportTable>,
    /// Why the audit could not produce a result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AuditEntry {
    fn from_result(meta: AuditMeta, result: AuditResult) -> Self {
        Self {
            id: meta.id,
            title: meta.title,
            description: meta.description,
            score_display_mode: meta.score_display_mode,
            score: Some(result.score),
            display_value: Some(result.display_value),
            details: Some(result.details),
            error_message: None,
        }
    }

    fn from_error(meta: AuditMeta, error: &AuditError) -> Self {
        Self {
            id: meta.id,
            title: meta.title,
            description: meta.description,
            score_display_mode: ScoreDisplayMode::Error,
            score: None,
            display_value: None,
            details: None,
            error_message: Some(error.to_string()),
        }
    }

    /// Whether the audit failed to run
    pub fn is_error(&self) -> bool {
        self.score_display_mode == ScoreDisplayMode::Error
    }
}

/// All audit entries of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub locale: String,
    pub generated_at: DateTime<Utc>,
    pub execution_time_ms: u64,
    pub audits: Vec<AuditEntry>,
}

impl RunReport {
    /// Entry for an audit id
    pub fn entry(&self, id: &str) -> Option<&AuditEntry> {
        self.audits.iter().find(|entry| entry.id == id)
    }

    /// Number of audits that failed to run
    pub fn error_count(&self) -> usize {
        self.audits.iter().filter(|entry| entry.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Runs a set of audits against gathered artifacts
pub struct AuditRunner {
    catalog: Box<dyn MessageCatalog>,
    audits: Vec<Box<dyn Audit>>,
}

impl AuditRunner {
    /// Runner with the built-in audits and the given catalog
    pub fn new(catalog: Box<dyn MessageCatalog>) -> Self {
        Self {
            catalog,
            audits: builtin_audits(),
        }
    }

    /// Runner without any registered audit
    pub fn empty(catalog: Box<dyn MessageCatalog>) -> Self {
        Self {
            catalog,
            audits: Vec::new(),
        }
    }

    /// Register an additional audit
    pub fn with_audit(mut self, audit: Box<dyn Audit>) -> Self {
        self.audits.push(audit);
        self
    }

    pub fn catalog(&self) -> &dyn MessageCatalog {
        self.catalog.as_ref()
    }

    /// Metadata of every registered audit
    pub fn audit_metas(&self) -> Vec<AuditMeta> {
        self.audits
            .iter()
            .map(|audit| audit.meta(self.catalog()))
            .collect()
    }

    /// Run every audit; failures become error entries
    pub fn run(&self, artifacts: &Artifacts, options: &RunOptions) -> RunReport {
        let start_time = Instant::now();

        let audits: Vec<AuditEntry> = if options.parallel && self.audits.len() > 1 {
            self.audits
                .par_iter()
                .map(|audit| self.run_entry(audit.as_ref(), artifacts))
                .collect()
        } else {
            self.audits
                .iter()
                .map(|audit| self.run_entry(audit.as_ref(), artifacts))
                .collect()
        };

        RunReport {
            locale: self.catalog.locale().to_string(),
            generated_at: Utc::now(),
            execution_time_ms: start_time.elapsed().as_millis() as u64,
            audits,
        }
    }

    /// Run a single audit after checking its required artifacts
    pub fn run_audit(&self, audit: &dyn Audit, artifacts: &Artifacts) -> AuditOutcome<AuditResult> {
        let meta = audit.meta(self.catalog());
        check_required_artifacts(&meta, artifacts)?;
        audit.run(artifacts, self.catalog())
    }

    fn run_entry(&self, audit: &dyn Audit, artifacts: &Artifacts) -> AuditEntry {
        let meta = audit.meta(self.catalog());

        match self.run_audit(audit, artifacts) {
            Ok(result) => {
                tracing::debug!("Audit '{}' finished: {}", meta.id, result.display_value);
                AuditEntry::from_result(meta, result)
            }
            Err(e) => {
                tracing::warn!("Audit '{}' failed: {}", meta.id, e);
                AuditEntry::from_error(meta, &e)
            }
        }
    }
}

impl Default for AuditRunner {
    fn default() -> Self {
        Self::new(Box::new(LocaleCatalog::english()))
    }
}

/// Fail if any artifact the audit declared is absent
pub fn check_required_artifacts(meta: &AuditMeta, artifacts: &Artifacts) -> AuditOutcome<()> {
    match meta
        .required_artifacts
        .iter()
        .find(|name| !artifacts.contains(name.as_str()))
    {
        Some(name) => Err(AuditError::missing_artifact(name.as_str())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::artifacts::ElementRecord;

    /// Audit that needs an artifact nobody gathers
    struct NeedsScreenshot;

    impl Audit for NeedsScreenshot {
        fn meta(&self, _catalog: &dyn MessageCatalog) -> AuditMeta {
            AuditMeta {
                id: "needs-screenshot".to_string(),
                title: "Needs screenshot".to_string(),
                description: String::new(),
                score_display_mode: ScoreDisplayMode::Binary,
                required_artifacts: vec!["Screenshot".to_string()],
            }
        }

        fn run(&self, _artifacts: &Artifacts, _catalog: &dyn MessageCatalog) -> AuditOutcome<AuditResult> {
            Ok(AuditResult {
                score: 0.0,
                display_value: String::new(),
                details: ReportTable::new(Vec::new(), Vec::new()),
            })
        }
    }

    fn hero_artifacts() -> Artifacts {
        Artifacts::with_element_records(&[ElementRecord::new("largest-contentful-paint")
            .with_path("1,HTML,1,BODY")
            .with_selector("body > img")
            .with_label("hero.png")
            .with_snippet("<img src=hero.png>")])
        .unwrap()
    }

    #[test]
    fn test_run_builtin_audit() {
        let runner = AuditRunner::default();
        let report = runner.run(&hero_artifacts(), &RunOptions::default());

        assert_eq!(report.locale, "en-US");
        assert!(!report.has_errors());

        let entry = report.entry("largest-contentful-paint-node").unwrap();
        assert_eq!(entry.score, Some(1.0));
        assert_eq!(entry.display_value.as_deref(), Some("1 element found"));
        assert_eq!(entry.score_display_mode, ScoreDisplayMode::Informative);
        assert_eq!(entry.details.as_ref().unwrap().items.len(), 1);
    }

    #[test]
    fn test_missing_artifact_becomes_error_entry() {
        let runner = AuditRunner::default();
        let report = runner.run(&Artifacts::new(), &RunOptions { parallel: false });

        let entry = report.entry("largest-contentful-paint-node").unwrap();
        assert!(entry.is_error());
        assert!(entry.score.is_none());
        assert_eq!(
            entry.error_message.as_deref(),
            Some("Required ElementRecords gatherer did not run")
        );
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn test_failure_does_not_block_siblings() {
        let runner = AuditRunner::default().with_audit(Box::new(NeedsScreenshot));
        let report = runner.run(&hero_artifacts(), &RunOptions::default());

        let ids: Vec<&str> = report.audits.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["largest-contentful-paint-node", "needs-screenshot"]);
        assert!(!report.audits[0].is_error());
        assert!(report.audits[1].is_error());
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn test_run_audit_checks_declared_artifacts() {
        let runner = AuditRunner::empty(Box::new(LocaleCatalog::english()));
        let err = runner.run_audit(&NeedsScreenshot, &hero_artifacts()).unwrap_err();

        assert!(matches!(err, AuditError::MissingRequiredArtifact { ref name } if name == "Screenshot"));
        assert!(runner.audit_metas().is_empty());
    }

    #[test]
    fn test_success_entry_writes_whole_score() {
        let records = vec![ElementRecord::new("largest-contentful-paint").with_path("p1")];
        let artifacts = Artifacts::with_element_records(&records).unwrap();
        let report = AuditRunner::default().run(&artifacts, &RunOptions::default());

        let text = serde_json::to_string(&report.audits[0]).unwrap();
        assert!(text.contains(r#""score":1,"#));

        let parsed: AuditEntry = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.score, Some(1.0));
    }

    #[test]
    fn test_error_entry_serialization() {
        let runner = AuditRunner::default();
        let report = runner.run(&Artifacts::new(), &RunOptions::default());
        let value = serde_json::to_value(&report).unwrap();

        let entry = &value["audits"][0];
        assert_eq!(entry["scoreDisplayMode"], "error");
        assert!(entry.get("score").is_none());
        assert!(entry.get("details").is_none());
        assert!(value["generatedAt"].is_string());
    }
}
