//! Report serialization
//!
//! Architecture: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - RunReport, AuditResult and AuditMeta are converted to their JSON wire shapes
//! - Rendering to documents or terminals is left to downstream consumers

use crate::domain::audit::{AuditError, AuditMeta, AuditOutcome, AuditResult};
use crate::runner::RunReport;
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single-line JSON
    Json,
    /// Indented JSON
    JsonPretty,
}

impl OutputFormat {
    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["json", "json-pretty"]
    }
}

impl FromStr for OutputFormat {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "json-pretty" | "pretty" => Ok(Self::JsonPretty),
            other => Err(AuditError::config(format!(
                "Unknown output format '{}'. Available: {}",
                other,
                Self::all_formats().join(", ")
            ))),
        }
    }
}

/// Serializes audit outputs in the requested format
#[derive(Debug, Clone, Copy)]
pub struct ReportFormatter {
    format: OutputFormat,
}

impl ReportFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format a full run report
    pub fn format_report(&self, report: &RunReport) -> AuditOutcome<String> {
        self.serialize(report)
    }

    /// Format the result of a single audit
    pub fn format_result(&self, result: &AuditResult) -> AuditOutcome<String> {
        self.serialize(result)
    }

    /// Format audit metadata
    pub fn format_metas(&self, metas: &[AuditMeta]) -> AuditOutcome<String> {
        self.serialize(metas)
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(&self, report: &RunReport, mut writer: W) -> AuditOutcome<()> {
        let formatted = self.format_report(report)?;
        writer.write_all(formatted.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> AuditOutcome<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string(value),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(value),
        }
        .map_err(|e| AuditError::serialization(format!("Failed to serialize output: {e}")))
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::JsonPretty)
    }
}
