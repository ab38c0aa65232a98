//! Category and priority vocabulary.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use crate::Error;

/// Nature of a support issue.
///
/// The vocabulary is closed. [`Category::Other`] is only ever assigned as the
/// fallback when nothing else matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Login failures, blocked access, broken password resets.
    LoginIssue,
    /// Double charges, refunds, pricing questions.
    BillingError,
    /// Outages and inaccessible systems.
    Downtime,
    /// Third-party API and CRM integration problems.
    Integration,
    /// Account verification emails and flows.
    Verification,
    /// No pattern matched.
    Other,
}

impl Category {
    /// Every category, in registry order.
    pub const ALL: [Self; 6] = [
        Self::LoginIssue,
        Self::BillingError,
        Self::Downtime,
        Self::Integration,
        Self::Verification,
        Self::Other,
    ];

    /// Label used in tables and reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LoginIssue => "login_issue",
            Self::BillingError => "billing_error",
            Self::Downtime => "downtime",
            Self::Integration => "integration",
            Self::Verification => "verification",
            Self::Other => "other",
        }
    }
}

// Categories sort by label so joined labels are stable across runs.
impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Urgency level. `P1` is the most urgent; ordering follows precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    /// Highest urgency.
    P1,
    /// Medium urgency.
    P2,
    /// Lowest urgency, and the default when nothing matched.
    #[default]
    P3,
}

impl Priority {
    /// Every level in precedence order.
    pub const ALL: [Self; 3] = [Self::P1, Self::P2, Self::P3];

    /// Label used in tables and reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "P1" => Ok(Self::P1),
            "P2" => Ok(Self::P2),
            "P3" => Ok(Self::P3),
            _ => Err(Error::UnknownPriority(s.to_string())),
        }
    }
}

/// A non-empty, sorted set of categories assigned to one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Categories(BTreeSet<Category>);

impl Categories {
    /// Builds a set from matched categories, falling back to `{other}`
    /// when nothing matched.
    #[must_use]
    pub fn from_matches(matched: impl IntoIterator<Item = Category>) -> Self {
        let mut set: BTreeSet<Category> = matched.into_iter().collect();
        if set.is_empty() {
            set.insert(Category::Other);
        }
        Self(set)
    }

    /// The `{other}` fallback set.
    #[must_use]
    pub fn other() -> Self {
        Self(BTreeSet::from([Category::Other]))
    }

    /// Iterates categories in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.iter().copied()
    }

    /// Checks membership.
    #[must_use]
    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    /// Number of categories (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; the set holds at least `other`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-joined sorted labels, e.g. `billing_error,downtime`.
    #[must_use]
    pub fn label(&self) -> String {
        self.iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Categories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_known_labels() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_parse_rejects_unknown() {
        assert!(matches!(
            "shipping".parse::<Category>(),
            Err(Error::UnknownCategory(name)) if name == "shipping"
        ));
    }

    #[test]
    fn test_category_order_follows_labels() {
        let mut sorted = Category::ALL.to_vec();
        sorted.sort();
        let labels: Vec<_> = sorted.iter().map(Category::as_str).collect();
        assert_eq!(
            labels,
            [
                "billing_error",
                "downtime",
                "integration",
                "login_issue",
                "other",
                "verification"
            ]
        );
    }

    #[test]
    fn test_priority_precedence_order() {
        assert!(Priority::P1 < Priority::P2);
        assert!(Priority::P2 < Priority::P3);
        assert_eq!(Priority::default(), Priority::P3);
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("P2".parse::<Priority>().unwrap(), Priority::P2);
        assert!("p2".parse::<Priority>().is_err());
    }

    #[test]
    fn test_categories_fallback_to_other() {
        let categories = Categories::from_matches([]);
        assert_eq!(categories, Categories::other());
        assert_eq!(categories.label(), "other");
        assert!(!categories.is_empty());
    }

    #[test]
    fn test_categories_label_is_sorted() {
        let categories = Categories::from_matches([
            Category::Verification,
            Category::BillingError,
            Category::LoginIssue,
            Category::BillingError,
        ]);
        assert_eq!(categories.len(), 3);
        assert_eq!(categories.label(), "billing_error,login_issue,verification");
    }
}
