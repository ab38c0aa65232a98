//! Ticket classification against a [`PatternRegistry`].

use tracing::debug;

use crate::record::{ClassifiedRecord, Record};
use crate::registry::{Categories, PatternRegistry, Priority};

/// Outcome of classifying one piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Matched categories, or `{other}`.
    pub categories: Categories,
    /// First matching priority level, or P3.
    pub priority: Priority,
}

/// Assigns categories and a priority to ticket text.
#[derive(Debug, Clone)]
pub struct Classifier {
    registry: PatternRegistry,
}

impl Classifier {
    /// Creates a classifier over the given registry.
    #[must_use]
    pub const fn new(registry: PatternRegistry) -> Self {
        Self { registry }
    }

    /// Classifies `text`, matching case-insensitively.
    #[must_use]
    pub fn classify(&self, text: &str) -> Classification {
        let text = text.to_lowercase();
        Classification {
            categories: self.categories(&text),
            priority: self.priority(&text),
        }
    }

    /// Classifies every record, keeping input order.
    #[must_use]
    pub fn classify_batch(&self, records: Vec<Record>) -> Vec<ClassifiedRecord> {
        records
            .into_iter()
            .map(|record| {
                let text = record.text();
                let Classification {
                    categories,
                    priority,
                } = self.classify(&text);
                debug!(line = record.line, %categories, %priority, "Classified ticket");
                ClassifiedRecord {
                    record,
                    text,
                    categories,
                    priority,
                }
            })
            .collect()
    }

    /// One hit per category is enough; remaining patterns of a matched
    /// category are not tested.
    fn categories(&self, text: &str) -> Categories {
        let matched = self
            .registry
            .category_patterns()
            .iter()
            .filter(|(_, patterns)| patterns.iter().any(|p| p.is_match(text)))
            .map(|(category, _)| *category);
        Categories::from_matches(matched)
    }

    fn priority(&self, text: &str) -> Priority {
        for (priority, patterns) in self.registry.priority_patterns() {
            if patterns.iter().any(|p| p.is_match(text)) {
                return *priority;
            }
        }
        Priority::P3
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(PatternRegistry::builtin())
    }
}
