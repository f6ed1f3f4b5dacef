//! Message catalogs and localizable UI strings
//!
//! Architecture: Dependency Injection - Audits never reach for global locale state
//! - Each audit declares its UI strings with English ICU defaults
//! - A MessageCatalog is passed explicitly into every formatting call
//! - LocaleCatalog overlays translated templates on the built-in defaults

pub mod plural;
pub mod template;

pub use plural::{EnglishPluralRules, PluralCategory, PluralRules, PluralSelector, PluralTable};
pub use template::{MessageParams, MessageTemplate, MessageValue};

use crate::domain::audit::{AuditError, AuditOutcome};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Locale used when nothing else is configured
pub const DEFAULT_LOCALE: &str = "en-US";

/// Resolves a template id and parameters to a localized string
pub trait MessageCatalog: Send + Sync {
    /// Locale tag this catalog renders
    fn locale(&self) -> &str;

    /// Render the template registered under `template_id`
    fn lookup(&self, template_id: &str, params: &MessageParams) -> String;
}

/// The UI strings declared by one audit, with their English ICU defaults
#[derive(Debug, Clone, Copy)]
pub struct UiStrings {
    /// Prefix shared by all template ids of this group
    pub namespace: &'static str,
    /// `(key, English ICU message)` pairs
    pub entries: &'static [(&'static str, &'static str)],
}

impl UiStrings {
    /// Template id for a key, e.g. `largest-contentful-paint-node | title`
    pub fn id(&self, key: &str) -> String {
        format!("{} | {}", self.namespace, key)
    }

    /// English default for a key
    pub fn default_message(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, message)| *message)
    }

    fn ids(&self) -> impl Iterator<Item = (String, &'static str)> + '_ {
        self.entries.iter().map(|(key, message)| (self.id(key), *message))
    }
}

/// Plural rules for a locale tag, keyed on its primary language subtag
pub fn plural_rules_for(locale: &str) -> Box<dyn PluralRules> {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    match language.as_str() {
        "fr" | "pt" => Box::new(ZeroOneRules),
        "ja" | "ko" | "zh" | "vi" | "th" | "id" | "ms" => Box::new(OtherOnlyRules),
        _ => Box::new(EnglishPluralRules),
    }
}

/// Languages where 0 and 1 share the `one` category
#[derive(Debug, Clone, Copy)]
struct ZeroOneRules;

impl PluralRules for ZeroOneRules {
    fn category(&self, count: u64) -> PluralCategory {
        if count <= 1 {
            PluralCategory::One
        } else {
            PluralCategory::Other
        }
    }
}

/// Languages without grammatical number
#[derive(Debug, Clone, Copy)]
struct OtherOnlyRules;

impl PluralRules for OtherOnlyRules {
    fn category(&self, _count: u64) -> PluralCategory {
        PluralCategory::Other
    }
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    message: String,
}

/// Catalog for one locale: translated templates over English defaults
pub struct LocaleCatalog {
    locale: String,
    rules: Box<dyn PluralRules>,
    defaults: BTreeMap<String, &'static str>,
    messages: BTreeMap<String, MessageTemplate>,
}

impl LocaleCatalog {
    /// Catalog rendering only the built-in English defaults
    pub fn english() -> Self {
        Self::new(DEFAULT_LOCALE)
    }

    /// Empty catalog for a locale, backed by the built-in English defaults
    pub fn new(locale: impl Into<String>) -> Self {
        let locale = locale.into();
        let defaults = crate::audits::builtin_ui_strings()
            .iter()
            .flat_map(|strings| strings.ids())
            .collect();

        Self {
            rules: plural_rules_for(&locale),
            locale,
            defaults,
            messages: BTreeMap::new(),
        }
    }

    /// Load translated templates from a locale file
    ///
    /// The file maps template ids to `{message: "<icu>"}` objects. YAML and JSON are
    /// both accepted.
    pub fn load_from_file<P: AsRef<Path>>(locale: impl Into<String>, path: P) -> AuditOutcome<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            AuditError::catalog(format!(
                "Failed to read catalog file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::load_from_str(locale, &contents)
    }

    /// Load translated templates from string content
    pub fn load_from_str(locale: impl Into<String>, content: &str) -> AuditOutcome<Self> {
        let entries: BTreeMap<String, CatalogEntry> = serde_yaml::from_str(content)
            .map_err(|e| AuditError::catalog(format!("Failed to parse catalog: {e}")))?;

        let mut catalog = Self::new(locale);
        for (id, entry) in entries {
            catalog.insert(id, &entry.message)?;
        }

        tracing::debug!(
            "Loaded {} messages for locale '{}'",
            catalog.messages.len(),
            catalog.locale
        );
        Ok(catalog)
    }

    /// Register a translated template
    pub fn insert(&mut self, template_id: impl Into<String>, message: &str) -> AuditOutcome<()> {
        let template = MessageTemplate::parse(message)?;
        self.messages.insert(template_id.into(), template);
        Ok(())
    }

    /// Whether a translation or default exists for this id
    pub fn contains(&self, template_id: &str) -> bool {
        self.messages.contains_key(template_id) || self.defaults.contains_key(template_id)
    }

    /// Number of translated templates
    pub fn translated_count(&self) -> usize {
        self.messages.len()
    }

    fn format_default(&self, template_id: &str, params: &MessageParams) -> String {
        let Some(source) = self.defaults.get(template_id) else {
            tracing::warn!("No message registered for '{}'", template_id);
            return template_id.to_string();
        };

        // Defaults are English, so they always use English plural rules.
        match MessageTemplate::parse(source)
            .and_then(|template| template.format(params, &EnglishPluralRules))
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to format default for '{}': {}", template_id, e);
                source.to_string()
            }
        }
    }
}

impl Default for LocaleCatalog {
    fn default() -> Self {
        Self::english()
    }
}

impl std::fmt::Debug for LocaleCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleCatalog")
            .field("locale", &self.locale)
            .field("defaults", &self.defaults.len())
            .field("messages", &self.messages.len())
            .finish()
    }
}

impl MessageCatalog for LocaleCatalog {
    fn locale(&self) -> &str {
        &self.locale
    }

    fn lookup(&self, template_id: &str, params: &MessageParams) -> String {
        match self.messages.get(template_id) {
            Some(template) => match template.format(params, self.rules.as_ref()) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(
                        "Falling back to default for '{}' in locale '{}' (template \"{}\"): {}",
                        template_id,
                        self.locale,
                        template.source(),
                        e
                    );
                    self.format_default(template_id, params)
                }
            },
            None => self.format_default(template_id, params),
        }
    }
}
