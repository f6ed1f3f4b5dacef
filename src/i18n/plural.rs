//! Plural rule selection
//!
//! Maps a count to a cardinality category and resolves a branch from an explicit
//! rule table. Locale rule sets plug in through the `PluralRules` trait.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cardinality category selected by a count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluralCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" => Ok(Self::Zero),
            "one" => Ok(Self::One),
            "two" => Ok(Self::Two),
            "few" => Ok(Self::Few),
            "many" => Ok(Self::Many),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown plural category '{s}'")),
        }
    }
}

/// Locale-specific mapping from a count to its cardinality category
pub trait PluralRules: Send + Sync {
    fn category(&self, count: u64) -> PluralCategory;
}

/// English cardinal rules: exactly one is `one`, everything else is `other`
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishPluralRules;

impl PluralRules for EnglishPluralRules {
    fn category(&self, count: u64) -> PluralCategory {
        if count == 1 {
            PluralCategory::One
        } else {
            PluralCategory::Other
        }
    }
}

/// Key of a branch in a plural rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralSelector {
    /// Matches one literal count (`=1`)
    Exact(u64),
    /// Matches every count mapped to the category
    Category(PluralCategory),
}

impl FromStr for PluralSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('=') {
            Some(number) => number
                .parse()
                .map(Self::Exact)
                .map_err(|_| format!("Invalid exact plural selector '{s}'")),
            None => s.parse().map(Self::Category),
        }
    }
}

impl fmt::Display for PluralSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "={n}"),
            Self::Category(category) => write!(f, "{category}"),
        }
    }
}

/// Ordered table of plural branches
#[derive(Debug, Clone, PartialEq)]
pub struct PluralTable<T> {
    branches: Vec<(PluralSelector, T)>,
}

impl<T> PluralTable<T> {
    pub fn new() -> Self {
        Self {
            branches: Vec::new(),
        }
    }

    /// Add a branch; a later branch with the same selector replaces the earlier one
    pub fn insert(&mut self, selector: PluralSelector, value: T) {
        match self.branches.iter_mut().find(|(s, _)| *s == selector) {
            Some(entry) => entry.1 = value,
            None => self.branches.push((selector, value)),
        }
    }

    pub fn with_branch(mut self, selector: PluralSelector, value: T) -> Self {
        self.insert(selector, value);
        self
    }

    /// Whether the table has the mandatory `other` branch
    pub fn has_other(&self) -> bool {
        self.get(PluralSelector::Category(PluralCategory::Other)).is_some()
    }

    pub fn get(&self, selector: PluralSelector) -> Option<&T> {
        self.branches
            .iter()
            .find(|(s, _)| *s == selector)
            .map(|(_, value)| value)
    }

    /// Pick the branch for a count: exact match, then the rule's category, then `other`
    pub fn select(&self, count: u64, rules: &dyn PluralRules) -> Option<&T> {
        self.get(PluralSelector::Exact(count))
            .or_else(|| self.get(PluralSelector::Category(rules.category(count))))
            .or_else(|| self.get(PluralSelector::Category(PluralCategory::Other)))
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

impl<T> Default for PluralTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn english_table() -> PluralTable<&'static str> {
        PluralTable::new()
            .with_branch(PluralSelector::Category(PluralCategory::One), "one")
            .with_branch(PluralSelector::Category(PluralCategory::Other), "other")
    }

    #[rstest]
    #[case(0, PluralCategory::Other)]
    #[case(1, PluralCategory::One)]
    #[case(2, PluralCategory::Other)]
    #[case(21, PluralCategory::Other)]
    fn test_english_categories(#[case] count: u64, #[case] expected: PluralCategory) {
        assert_eq!(EnglishPluralRules.category(count), expected);
    }

    #[rstest]
    #[case(0, "other")]
    #[case(1, "one")]
    #[case(7, "other")]
    fn test_select_by_category(#[case] count: u64, #[case] expected: &str) {
        assert_eq!(english_table().select(count, &EnglishPluralRules), Some(&expected));
    }

    #[test]
    fn test_exact_selector_wins_over_category() {
        let table = english_table().with_branch(PluralSelector::Exact(0), "none");

        assert_eq!(table.select(0, &EnglishPluralRules), Some(&"none"));
        assert_eq!(table.select(1, &EnglishPluralRules), Some(&"one"));
    }

    #[test]
    fn test_missing_category_falls_back_to_other() {
        let table = PluralTable::new()
            .with_branch(PluralSelector::Category(PluralCategory::Other), "other");

        assert_eq!(table.select(1, &EnglishPluralRules), Some(&"other"));
        assert!(table.has_other());
        assert!(PluralTable::<&str>::new().select(1, &EnglishPluralRules).is_none());
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!("=1".parse::<PluralSelector>(), Ok(PluralSelector::Exact(1)));
        assert_eq!(
            "few".parse::<PluralSelector>(),
            Ok(PluralSelector::Category(PluralCategory::Few))
        );
        assert!("=x".parse::<PluralSelector>().is_err());
        assert!("lots".parse::<PluralSelector>().is_err());
        assert_eq!(PluralSelector::Exact(3).to_string(), "=3");
    }
}
