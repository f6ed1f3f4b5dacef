//! Configuration loading and management for the LCP node audit
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to validated settings
//! - Defaults are embedded in code, a config file only overrides them
//! - Configuration resolves the message catalog the runner is built with

use crate::domain::audit::{AuditError, AuditOutcome};
use crate::i18n::{LocaleCatalog, DEFAULT_LOCALE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Supported configuration format versions
const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Configuration format version
    pub version: String,
    /// Locale tag used to render UI strings
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Optional locale catalog file with translated templates
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,
    /// Run audits in parallel
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            parallel: true,
        }
    }
}

impl AuditConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AuditOutcome<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            AuditError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let mut config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            AuditError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        // Catalog paths are relative to the config file
        if let (Some(catalog), Some(parent)) = (&config.catalog, path.as_ref().parent()) {
            if catalog.is_relative() {
                config.catalog = Some(parent.join(catalog));
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> AuditOutcome<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| AuditError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Default configuration: English strings, pretty output
    pub fn with_defaults() -> Self {
        Self {
            version: "1.0".to_string(),
            locale: default_locale(),
            catalog: None,
            output: OutputConfig::default(),
        }
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> AuditOutcome<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version.as_str()) {
            return Err(AuditError::config(format!(
                "Unsupported configuration version: {}. Supported versions: {}",
                self.version,
                SUPPORTED_VERSIONS.join(", ")
            )));
        }

        let valid_locale = !self.locale.is_empty()
            && self
                .locale
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid_locale {
            return Err(AuditError::config(format!(
                "Invalid locale tag '{}'",
                self.locale
            )));
        }

        Ok(())
    }

    /// Build the message catalog for the configured locale
    pub fn load_catalog(&self) -> AuditOutcome<LocaleCatalog> {
        match &self.catalog {
            Some(path) => LocaleCatalog::load_from_file(&self.locale, path),
            None => Ok(LocaleCatalog::new(&self.locale)),
        }
    }

    /// Convert to YAML
    pub fn to_yaml(&self) -> AuditOutcome<String> {
        serde_yaml::to_string(self)
            .map_err(|e| AuditError::config(format!("Failed to serialize config: {e}")))
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_true() -> bool {
    true
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: AuditConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: AuditConfig::default(),
        }
    }

    /// Set the locale
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.config.locale = locale.into();
        self
    }

    /// Set the catalog file
    pub fn catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.catalog = Some(path.into());
        self
    }

    /// Toggle pretty output
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.output.pretty = pretty;
        self
    }

    /// Toggle parallel execution
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.output.parallel = parallel;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> AuditOutcome<AuditConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
