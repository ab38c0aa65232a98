//! Batch aggregation over classified tickets.
//!
//! Every function here is pure and expects the full batch: classification
//! must have finished for all records before any of them is called.

use std::collections::{BTreeMap, HashMap};

use crate::record::ClassifiedRecord;
use crate::registry::{Categories, Priority};

/// Ticket count for one (categories, priority) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    /// Category set shared by the group.
    pub categories: Categories,
    /// Priority shared by the group.
    pub priority: Priority,
    /// Number of tickets.
    pub count: usize,
}

/// Ticket count for one (sender, categories, priority) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderSummary {
    /// Sender identifier.
    pub sender: String,
    /// Category set shared by the group.
    pub categories: Categories,
    /// Priority shared by the group.
    pub priority: Priority,
    /// Number of tickets.
    pub count: usize,
}

/// A body text seen more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// The exact body text.
    pub body: String,
    /// Number of tickets carrying it (always > 1).
    pub count: usize,
}

/// Counts tickets per (categories label, priority), sorted by that key.
#[must_use]
pub fn group_by_category_priority(records: &[ClassifiedRecord]) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<(String, Priority), (Categories, usize)> = BTreeMap::new();
    for r in records {
        groups
            .entry((r.categories.label(), r.priority))
            .or_insert_with(|| (r.categories.clone(), 0))
            .1 += 1;
    }

    groups
        .into_iter()
        .map(|((_, priority), (categories, count))| CategorySummary {
            categories,
            priority,
            count,
        })
        .collect()
}

/// Orders summary rows for display: priority ascending, then count
/// descending. Equal rows keep their relative order.
#[must_use]
pub fn sort_for_report(summary: &[CategorySummary]) -> Vec<CategorySummary> {
    let mut rows = summary.to_vec();
    rows.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| b.count.cmp(&a.count))
    });
    rows
}

/// Counts tickets per (sender, categories label, priority), sorted by that
/// key.
#[must_use]
pub fn group_by_sender_category_priority(records: &[ClassifiedRecord]) -> Vec<SenderSummary> {
    let mut groups: BTreeMap<(&str, String, Priority), (Categories, usize)> = BTreeMap::new();
    for r in records {
        groups
            .entry((r.record.sender.as_str(), r.categories.label(), r.priority))
            .or_insert_with(|| (r.categories.clone(), 0))
            .1 += 1;
    }

    groups
        .into_iter()
        .map(|((sender, _, priority), (categories, count))| SenderSummary {
            sender: sender.to_string(),
            categories,
            priority,
            count,
        })
        .collect()
}

/// Finds bodies shared by more than one ticket.
///
/// Comparison is exact, whitespace included. Sorted by count descending;
/// equal counts keep the order in which each body first appeared. Empty
/// bodies are treated as absent and never grouped.
#[must_use]
pub fn find_duplicate_bodies(records: &[ClassifiedRecord]) -> Vec<DuplicateGroup> {
    let mut first_seen: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in records {
        let body = r.record.body.as_str();
        if body.is_empty() {
            continue;
        }
        let count = counts.entry(body).or_insert(0);
        if *count == 0 {
            first_seen.push(body);
        }
        *count += 1;
    }

    let mut duplicates: Vec<DuplicateGroup> = first_seen
        .into_iter()
        .filter_map(|body| {
            let count = counts.get(body).copied().unwrap_or(0);
            (count > 1).then(|| DuplicateGroup {
                body: body.to_string(),
                count,
            })
        })
        .collect();
    duplicates.sort_by(|a, b| b.count.cmp(&a.count));
    duplicates
}
