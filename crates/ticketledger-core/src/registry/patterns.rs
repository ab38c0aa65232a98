//! Compiled pattern tables.

use std::collections::BTreeMap;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use tracing::debug;

use super::model::{Category, Priority};
use crate::{Error, Result};

const LOGIN_ISSUE: &[&str] = &[
    r"unable to log in",
    r"system access blocked",
    r"cannot reset my password",
    r"reset link doesn’t seem to work",
    r"reset link doesn't seem to work",
];

const BILLING_ERROR: &[&str] = &[
    r"charged twice",
    r"billing error",
    r"refund",
    r"pricing tiers",
    r"pricing breakdown",
];

const DOWNTIME: &[&str] = &[
    r"servers are down",
    r"system is completely inaccessible",
    r"downtime",
];

const INTEGRATION: &[&str] = &[
    r"third-party apis",
    r"crm integration",
    r"integration with api",
];

const VERIFICATION: &[&str] = &[
    r"verifying my account",
    r"verification email never arrived",
    r"account verification",
];

const P1_HINTS: &[&str] = &[
    r"urgent",
    r"critical",
    r"immediate",
    r"highly critical",
    r"completely inaccessible",
];

const P2_HINTS: &[&str] = &[r"unable to log in", r"servers are down", r"charged twice"];

const P3_HINTS: &[&str] = &[r"pricing", r"integration", r"refund", r"verification"];

/// A single case-insensitive signal-phrase matcher.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if `source` is not a valid regex.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::InvalidPattern {
                pattern: source.clone(),
                source: e,
            })?;
        Ok(Self { source, regex })
    }

    /// The pattern as written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Unanchored search; substrings of longer words match.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Immutable mapping of categories and priority levels to their patterns.
///
/// Build one before classification starts and hand it to a
/// [`Classifier`](crate::Classifier); it is never mutated afterwards.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    categories: Vec<(Category, Vec<Pattern>)>,
    priorities: Vec<(Priority, Vec<Pattern>)>,
}

/// On-disk registry shape.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    #[serde(default)]
    categories: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    priorities: BTreeMap<String, Vec<String>>,
}

impl PatternRegistry {
    /// Builds a registry from raw pattern lists.
    ///
    /// Categories keep the order given. Priority levels are always stored
    /// in precedence order P1, P2, P3 regardless of input order; a level
    /// given more than once has its patterns appended.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern does not compile or if
    /// [`Category::Other`] is given patterns.
    pub fn new<C, P, S>(categories: C, priorities: P) -> Result<Self>
    where
        C: IntoIterator<Item = (Category, Vec<S>)>,
        P: IntoIterator<Item = (Priority, Vec<S>)>,
        S: Into<String>,
    {
        let mut compiled_categories: Vec<(Category, Vec<Pattern>)> = Vec::new();
        for (category, sources) in categories {
            if category == Category::Other {
                return Err(Error::Config(
                    "`other` is the fallback category and cannot have patterns".to_string(),
                ));
            }
            let patterns = compile_all(sources)?;
            match compiled_categories.iter_mut().find(|(c, _)| *c == category) {
                Some((_, existing)) => existing.extend(patterns),
                None => compiled_categories.push((category, patterns)),
            }
        }

        let mut by_level: BTreeMap<Priority, Vec<Pattern>> = BTreeMap::new();
        for (priority, sources) in priorities {
            by_level
                .entry(priority)
                .or_default()
                .extend(compile_all(sources)?);
        }
        let priorities = Priority::ALL
            .into_iter()
            .map(|p| (p, by_level.remove(&p).unwrap_or_default()))
            .collect();

        Ok(Self {
            categories: compiled_categories,
            priorities,
        })
    }

    /// The built-in support-ticket tables.
    #[must_use]
    #[allow(clippy::expect_used)] // built-in tables are plain literals
    pub fn builtin() -> Self {
        Self::new(
            [
                (Category::LoginIssue, LOGIN_ISSUE.to_vec()),
                (Category::BillingError, BILLING_ERROR.to_vec()),
                (Category::Downtime, DOWNTIME.to_vec()),
                (Category::Integration, INTEGRATION.to_vec()),
                (Category::Verification, VERIFICATION.to_vec()),
            ],
            [
                (Priority::P1, P1_HINTS.to_vec()),
                (Priority::P2, P2_HINTS.to_vec()),
                (Priority::P3, P3_HINTS.to_vec()),
            ],
        )
        .expect("built-in patterns compile")
    }

    /// Parses a registry from JSON.
    ///
    /// ```json
    /// {
    ///   "categories": { "billing_error": ["refund"] },
    ///   "priorities": { "P1": ["urgent"] }
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON, unknown category or priority
    /// names, patterns for `other`, or invalid regexes.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: RegistryFile = serde_json::from_str(json)?;

        let categories = file
            .categories
            .into_iter()
            .map(|(name, patterns)| name.parse::<Category>().map(|c| (c, patterns)))
            .collect::<Result<Vec<_>>>()?;
        let priorities = file
            .priorities
            .into_iter()
            .map(|(name, patterns)| name.parse::<Priority>().map(|p| (p, patterns)))
            .collect::<Result<Vec<_>>>()?;

        Self::new(categories, priorities)
    }

    /// Loads a registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// registry (see [`PatternRegistry::from_json`]).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read pattern file {}: {e}", path.display()))
        })?;
        let registry = Self::from_json(&json)?;
        debug!(
            "Loaded {} category and {} priority patterns from {}",
            registry.category_pattern_count(),
            registry.priority_pattern_count(),
            path.display()
        );
        Ok(registry)
    }

    /// Category patterns in registry order.
    #[must_use]
    pub fn category_patterns(&self) -> &[(Category, Vec<Pattern>)] {
        &self.categories
    }

    /// Priority patterns in precedence order P1, P2, P3.
    #[must_use]
    pub fn priority_patterns(&self) -> &[(Priority, Vec<Pattern>)] {
        &self.priorities
    }

    fn category_pattern_count(&self) -> usize {
        self.categories.iter().map(|(_, p)| p.len()).sum()
    }

    fn priority_pattern_count(&self) -> usize {
        self.priorities.iter().map(|(_, p)| p.len()).sum()
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn compile_all<S: Into<String>>(sources: Vec<S>) -> Result<Vec<Pattern>> {
    sources.into_iter().map(Pattern::new).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_priorities_in_precedence_order() {
        let registry = PatternRegistry::builtin();
        let levels: Vec<_> = registry
            .priority_patterns()
            .iter()
            .map(|(p, _)| *p)
            .collect();
        assert_eq!(levels, Priority::ALL);
    }

    #[test]
    fn test_builtin_never_maps_other() {
        let registry = PatternRegistry::builtin();
        assert_eq!(registry.category_patterns().len(), 5);
        assert!(
            registry
                .category_patterns()
                .iter()
                .all(|(c, _)| *c != Category::Other)
        );
    }

    #[test]
    fn test_pattern_is_case_insensitive_substring() {
        let pattern = Pattern::new("refund").unwrap();
        assert!(pattern.is_match("nonrefundable"));
        assert!(pattern.is_match("REFUNDED"));
        assert!(!pattern.is_match("re-fund"));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = Pattern::new("unclosed (group").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { pattern, .. } if pattern == "unclosed (group"));
    }

    #[test]
    fn test_new_sorts_priorities_and_fills_missing_levels() {
        let registry = PatternRegistry::new(
            [(Category::Downtime, vec!["outage"])],
            [(Priority::P3, vec!["whenever"]), (Priority::P1, vec!["now"])],
        )
        .unwrap();

        let levels: Vec<_> = registry
            .priority_patterns()
            .iter()
            .map(|(p, patterns)| (*p, patterns.len()))
            .collect();
        assert_eq!(
            levels,
            [(Priority::P1, 1), (Priority::P2, 0), (Priority::P3, 1)]
        );
    }

    #[test]
    fn test_new_rejects_other_category() {
        let result = PatternRegistry::new(
            [(Category::Other, vec!["anything"])],
            Vec::<(Priority, Vec<&str>)>::new(),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_json() {
        let registry = PatternRegistry::from_json(
            r#"{
                "categories": { "billing_error": ["invoice"], "downtime": ["outage"] },
                "priorities": { "P2": ["asap"] }
            }"#,
        )
        .unwrap();

        assert_eq!(registry.category_patterns().len(), 2);
        let p2 = &registry.priority_patterns()[1];
        assert_eq!(p2.0, Priority::P2);
        assert_eq!(p2.1[0].source(), "asap");
    }

    #[test]
    fn test_from_json_rejects_unknown_names() {
        assert!(matches!(
            PatternRegistry::from_json(r#"{"categories": {"shipping": ["parcel"]}}"#),
            Err(Error::UnknownCategory(_))
        ));
        assert!(matches!(
            PatternRegistry::from_json(r#"{"priorities": {"P4": ["later"]}}"#),
            Err(Error::UnknownPriority(_))
        ));
        assert!(matches!(
            PatternRegistry::from_json(r#"{"labels": {}}"#),
            Err(Error::Serde(_))
        ));
    }
}
