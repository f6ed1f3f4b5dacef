//! Core domain models for audit metadata, audit results and detail tables
//!
//! Architecture: Value Objects - Results are built once per run and never mutated afterwards
//! - ReportTable owns the renderer-agnostic rows produced by an audit
//! - AuditMeta is the static description an audit registry discovers
//! - AuditError is the single error vocabulary shared by every layer

use serde::{Deserialize, Serialize, Serializer};

/// How an audit's score participates in the aggregate report score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreDisplayMode {
    /// Score is a number between 0 and 1
    Numeric,
    /// Score is either 0 or 1
    Binary,
    /// Audit needs a human to verify it
    Manual,
    /// Audit only surfaces information and never affects the aggregate score
    Informative,
    /// Audit did not apply to the page
    NotApplicable,
    /// Audit failed to run
    Error,
}

impl ScoreDisplayMode {
    /// Whether a score in this mode contributes to the aggregate score
    pub fn affects_score(self) -> bool {
        matches!(self, Self::Numeric | Self::Binary)
    }

    /// Convert to the wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Binary => "binary",
            Self::Manual => "manual",
            Self::Informative => "informative",
            Self::NotApplicable => "notApplicable",
            Self::Error => "error",
        }
    }
}

/// Static description of an audit, exposed for discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditMeta {
    /// Stable audit identifier
    pub id: String,
    /// Localized title
    pub title: String,
    /// Localized description
    pub description: String,
    /// How the score is displayed and aggregated
    pub score_display_mode: ScoreDisplayMode,
    /// Names of the artifacts that must be present before the audit runs
    pub required_artifacts: Vec<String>,
}

/// Value type tag used by table headings and item values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemValueType {
    /// A reference to a single page element
    Node,
}

/// Renderer-agnostic reference to one page element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeReference {
    #[serde(rename = "type")]
    pub kind: ItemValueType,
    /// Structural location of the element, e.g. `1,HTML,1,BODY`
    pub path: String,
    pub selector: String,
    pub node_label: String,
    pub snippet: String,
}

/// One table row holding a single node under the `node` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub node: NodeReference,
}

/// Column description of a details table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableHeading {
    /// Row key this column reads from
    pub key: String,
    pub item_type: ItemValueType,
    /// Localized column label
    pub text: String,
}

/// Details kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailsType {
    Table,
}

/// Structured details table attached to an audit result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    #[serde(rename = "type")]
    pub kind: DetailsType,
    pub headings: Vec<TableHeading>,
    pub items: Vec<TableRow>,
}

impl ReportTable {
    /// Create a table from headings and rows
    pub fn new(headings: Vec<TableHeading>, items: Vec<TableRow>) -> Self {
        Self {
            kind: DetailsType::Table,
            headings,
            items,
        }
    }

    /// Number of rows in the table
    pub fn row_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Product of a single audit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// Score between 0 and 1
    #[serde(serialize_with = "serialize_score")]
    pub score: f64,
    /// Localized one-line summary
    pub display_value: String,
    pub details: ReportTable,
}

/// Write whole scores as integers (`1`, not `1.0`)
pub fn serialize_score<S: Serializer>(score: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if score.is_finite() && score.fract() == 0.0 {
        serializer.serialize_i64(*score as i64)
    } else {
        serializer.serialize_f64(*score)
    }
}

/// `serialize_score` for optional scores
pub fn serialize_optional_score<S: Serializer>(
    score: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match score {
        Some(score) => serialize_score(score, serializer),
        None => serializer.serialize_none(),
    }
}

/// Error types that can occur while running audits
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// A required artifact was not provided to the audit
    #[error("Required {name} gatherer did not run")]
    MissingRequiredArtifact { name: String },

    /// A required artifact was present but could not be decoded
    #[error("Required {name} artifact is malformed: {message}")]
    MalformedArtifact { name: String, message: String },

    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Message catalog or template could not be loaded or parsed
    #[error("Message catalog error: {message}")]
    Catalog { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Output could not be serialized
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl AuditError {
    /// Create a missing artifact error
    pub fn missing_artifact(name: impl Into<String>) -> Self {
        Self::MissingRequiredArtifact { name: name.into() }
    }

    /// Create a malformed artifact error
    pub fn malformed_artifact(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedArtifact {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Whether this error is a precondition failure on the audit's inputs
    pub fn is_artifact_error(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredArtifact { .. } | Self::MalformedArtifact { .. }
        )
    }
}

/// Result type for audit operations
pub type AuditOutcome<T> = Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> TableRow {
        TableRow {
            node: NodeReference {
                kind: ItemValueType::Node,
                path: "1,HTML,1,BODY".to_string(),
                selector: "body > img".to_string(),
                node_label: "hero.png".to_string(),
                snippet: "<img src=hero.png>".to_string(),
            },
        }
    }

    #[test]
    fn test_table_serializes_to_wire_shape() {
        let table = ReportTable::new(
            vec![TableHeading {
                key: "node".to_string(),
                item_type: ItemValueType::Node,
                text: "Element".to_string(),
            }],
            vec![sample_row()],
        );

        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "table",
                "headings": [{"key": "node", "itemType": "node", "text": "Element"}],
                "items": [{"node": {
                    "type": "node",
                    "path": "1,HTML,1,BODY",
                    "selector": "body > img",
                    "nodeLabel": "hero.png",
                    "snippet": "<img src=hero.png>"
                }}]
            })
        );
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_whole_score_serializes_as_integer() {
        let result = AuditResult {
            score: 1.0,
            display_value: "0 elements found".to_string(),
            details: ReportTable::new(Vec::new(), Vec::new()),
        };

        let text = serde_json::to_string(&result).unwrap();
        assert!(text.starts_with(r#"{"score":1,"displayValue""#));

        let parsed: AuditResult = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, result);

        let half = AuditResult { score: 0.5, ..result };
        assert_eq!(serde_json::to_value(&half).unwrap()["score"], json!(0.5));
    }

    #[test]
    fn test_score_display_mode() {
        assert!(!ScoreDisplayMode::Informative.affects_score());
        assert!(ScoreDisplayMode::Binary.affects_score());
        assert_eq!(
            serde_json::to_value(ScoreDisplayMode::NotApplicable).unwrap(),
            json!("notApplicable")
        );
        assert_eq!(ScoreDisplayMode::Informative.as_str(), "informative");
    }

    #[test]
    fn test_error_classification() {
        let missing = AuditError::missing_artifact("ElementRecords");
        assert!(missing.is_artifact_error());
        assert_eq!(missing.to_string(), "Required ElementRecords gatherer did not run");

        let config = AuditError::config("bad version");
        assert!(!config.is_artifact_error());
        assert_eq!(config.to_string(), "Configuration error: bad version");
    }
}
