//! Text report rendering.

use chrono::{DateTime, Utc};

use crate::aggregate::{CategorySummary, DuplicateGroup, sort_for_report};

/// Maximum body characters shown per duplicate.
pub const SNIPPET_CHARS: usize = 120;

/// Renders the triage report.
///
/// Summary rows are re-ordered for display (priority, then count
/// descending). The output has no trailing newline.
#[must_use]
pub fn render(
    summary: &[CategorySummary],
    duplicates: &[DuplicateGroup],
    generated_at: DateTime<Utc>,
) -> String {
    let mut lines = vec![
        "# Support Triage Report".to_string(),
        format!("_Generated: {}_", format_timestamp(generated_at)),
        String::new(),
        "## Totals by Category & Priority".to_string(),
    ];

    for row in sort_for_report(summary) {
        lines.push(format!(
            "- {} / {}: {}",
            row.categories.label(),
            row.priority,
            row.count
        ));
    }

    lines.push(String::new());
    lines.push("## Notable Duplicates (same body text)".to_string());
    if duplicates.is_empty() {
        lines.push("- None found.".to_string());
    } else {
        for group in duplicates {
            lines.push(format!("- {}× — \"{}\"", group.count, snippet(&group.body)));
        }
    }

    lines.join("\n")
}

/// UTC ISO-8601 with microsecond precision and a `Z` suffix.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// First [`SNIPPET_CHARS`] characters with newlines flattened to spaces.
fn snippet(body: &str) -> String {
    body.chars()
        .take(SNIPPET_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::registry::{Categories, Category, Priority};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    fn row(categories: &[Category], priority: Priority, count: usize) -> CategorySummary {
        CategorySummary {
            categories: Categories::from_matches(categories.iter().copied()),
            priority,
            count,
        }
    }

    #[test]
    fn test_render_full_report() {
        let summary = [
            row(&[Category::BillingError], Priority::P3, 2),
            row(&[Category::Downtime, Category::LoginIssue], Priority::P1, 1),
            row(&[Category::Other], Priority::P3, 5),
        ];
        let duplicates = [DuplicateGroup {
            body: "Same text\nhere".to_string(),
            count: 2,
        }];

        let report = render(&summary, &duplicates, at());
        assert_eq!(
            report,
            "# Support Triage Report\n\
             _Generated: 2024-05-01T12:30:00.000000Z_\n\
             \n\
             ## Totals by Category & Priority\n\
             - downtime,login_issue / P1: 1\n\
             - other / P3: 5\n\
             - billing_error / P3: 2\n\
             \n\
             ## Notable Duplicates (same body text)\n\
             - 2× — \"Same text here\""
        );
    }

    #[test]
    fn test_render_without_duplicates() {
        let report = render(&[row(&[], Priority::P3, 1)], &[], at());
        assert!(report.ends_with("## Notable Duplicates (same body text)\n- None found."));
        assert!(report.contains("- other / P3: 1\n"));
    }

    #[test]
    fn test_render_empty_summary() {
        let report = render(&[], &[], at());
        assert!(report.contains("## Totals by Category & Priority\n\n## Notable Duplicates"));
    }

    #[test]
    fn test_snippet_truncates_by_characters() {
        let body = "é".repeat(200);
        let s = snippet(&body);
        assert_eq!(s.chars().count(), SNIPPET_CHARS);
        assert!(s.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_snippet_short_body_unchanged() {
        assert_eq!(snippet("line one\nline two"), "line one line two");
    }

    #[test]
    fn test_format_timestamp() {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::microseconds(123_456);
        assert_eq!(format_timestamp(t), "2024-01-02T03:04:05.123456Z");
    }
}
