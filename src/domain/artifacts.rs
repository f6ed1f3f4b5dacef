//! Input artifacts handed to audits by the gathering pipeline
//!
//! Architecture: Anti-Corruption Layer - Raw JSON artifacts are decoded into typed records on demand
//! - Artifacts is a named bag of untyped JSON values, owned upstream
//! - Audits ask for the artifacts they declared and receive typed values or a precondition error

use crate::domain::audit::{AuditError, AuditOutcome};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Artifact name of the trace-derived element record collection
pub const ELEMENT_RECORDS: &str = "ElementRecords";

/// A page element implicated in a performance metric, as produced by tracing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    /// Metric this element is associated with, e.g. `largest-contentful-paint`
    pub metric_tag: String,
    #[serde(default)]
    pub node_path: String,
    #[serde(default)]
    pub selector: String,
    #[serde(default)]
    pub node_label: String,
    #[serde(default)]
    pub snippet: String,
}

impl ElementRecord {
    /// Create a record for the given metric tag with empty node fields
    pub fn new(metric_tag: impl Into<String>) -> Self {
        Self {
            metric_tag: metric_tag.into(),
            node_path: String::new(),
            selector: String::new(),
            node_label: String::new(),
            snippet: String::new(),
        }
    }

    /// Set the structural path
    pub fn with_path(mut self, node_path: impl Into<String>) -> Self {
        self.node_path = node_path.into();
        self
    }

    /// Set the selector
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    /// Set the human-readable label
    pub fn with_label(mut self, node_label: impl Into<String>) -> Self {
        self.node_label = node_label.into();
        self
    }

    /// Set the markup excerpt
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }
}

/// Named collection of gathered artifacts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Artifacts {
    entries: BTreeMap<String, JsonValue>,
}

impl Artifacts {
    /// Create an empty artifact collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an artifact collection from a JSON object
    pub fn from_json(content: &str) -> AuditOutcome<Self> {
        serde_json::from_str(content)
            .map_err(|e| AuditError::serialization(format!("Failed to parse artifacts: {e}")))
    }

    /// Build a collection holding only the element records
    pub fn with_element_records(records: &[ElementRecord]) -> AuditOutcome<Self> {
        let mut artifacts = Self::new();
        artifacts.insert(ELEMENT_RECORDS, records)?;
        Ok(artifacts)
    }

    /// Store a serializable value under an artifact name
    pub fn insert<T: Serialize + ?Sized>(
        &mut self,
        name: impl Into<String>,
        value: &T,
    ) -> AuditOutcome<()> {
        let name = name.into();
        let value = serde_json::to_value(value).map_err(|e| {
            AuditError::serialization(format!("Failed to encode artifact '{name}': {e}"))
        })?;
        self.entries.insert(name, value);
        Ok(())
    }

    /// Whether an artifact with this name is present
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Names of all present artifacts
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Decode a required artifact, failing if it is absent or has the wrong shape
    pub fn require<T: DeserializeOwned>(&self, name: &str) -> AuditOutcome<T> {
        let value = self
            .entries
            .get(name)
            .ok_or_else(|| AuditError::missing_artifact(name))?;

        T::deserialize(value).map_err(|e| AuditError::malformed_artifact(name, e.to_string()))
    }

    /// Decode the element record collection
    pub fn element_records(&self) -> AuditOutcome<Vec<ElementRecord>> {
        self.require(ELEMENT_RECORDS)
    }
}
