//! Ticket records and their timestamps.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::registry::{Categories, Priority};

/// Zone-less layouts tried in order after RFC 3339 and RFC 2822.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Offset-carrying layouts that RFC 3339 parsing does not cover.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// When a ticket was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentDate {
    /// No zone information in the source value.
    Naive(NaiveDateTime),
    /// A fixed UTC offset was given.
    Offset(DateTime<FixedOffset>),
}

impl SentDate {
    /// Parses a timestamp in any of the accepted layouts.
    ///
    /// Returns `None` for empty or unrecognized input.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self::Offset(dt));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(Self::Offset(dt));
        }
        if let Some(dt) = OFFSET_DATETIME_FORMATS
            .iter()
            .find_map(|f| DateTime::parse_from_str(s, f).ok())
        {
            return Some(Self::Offset(dt));
        }
        if let Some(dt) = NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        {
            return Some(Self::Naive(dt));
        }
        DATE_FORMATS
            .iter()
            .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
            .map(|d| Self::Naive(d.and_time(chrono::NaiveTime::MIN)))
    }
}

impl fmt::Display for SentDate {
    /// Normalized form: `YYYY-MM-DD HH:MM:SS`, with `+HH:MM` appended when
    /// an offset is known.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Naive(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Self::Offset(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%:z")),
        }
    }
}

/// One support ticket as read from the input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Line number in the source file (header is line 1).
    pub line: u64,
    /// Sender identifier, never empty.
    pub sender: String,
    /// Subject line; empty when absent.
    pub subject: String,
    /// Body text; empty when absent.
    pub body: String,
    /// Parsed send time.
    pub sent_date: SentDate,
}

impl Record {
    /// Subject and body joined by a space, surrounding whitespace trimmed.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{} {}", self.subject, self.body).trim().to_string()
    }
}

/// A record together with its triage outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRecord {
    /// The source record.
    pub record: Record,
    /// Text the classification was computed from.
    pub text: String,
    /// Assigned categories.
    pub categories: Categories,
    /// Assigned priority.
    pub priority: Priority,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(subject: &str, body: &str) -> Record {
        Record {
            line: 2,
            sender: "a@example.com".to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            sent_date: SentDate::parse("2024-01-01").unwrap(),
        }
    }

    #[test]
    fn test_text_joins_subject_and_body() {
        assert_eq!(record("Help", "cannot log in").text(), "Help cannot log in");
    }

    #[test]
    fn test_text_trims_missing_parts() {
        assert_eq!(record("", "body only").text(), "body only");
        assert_eq!(record("subject only", "").text(), "subject only");
        assert_eq!(record("", "").text(), "");
    }

    #[test]
    fn test_parse_naive_datetime() {
        let date = SentDate::parse("2024-03-05 14:07:09").unwrap();
        assert!(matches!(date, SentDate::Naive(_)));
        assert_eq!(date.to_string(), "2024-03-05 14:07:09");
    }

    #[test]
    fn test_parse_date_only() {
        assert_eq!(
            SentDate::parse("2024-03-05").unwrap().to_string(),
            "2024-03-05 00:00:00"
        );
        assert_eq!(
            SentDate::parse("03/05/2024").unwrap().to_string(),
            "2024-03-05 00:00:00"
        );
    }

    #[test]
    fn test_parse_rfc3339_keeps_offset() {
        let date = SentDate::parse("2024-03-05T14:07:09+02:00").unwrap();
        assert_eq!(date.to_string(), "2024-03-05 14:07:09+02:00");

        let utc = SentDate::parse("2024-03-05T14:07:09Z").unwrap();
        assert_eq!(utc.to_string(), "2024-03-05 14:07:09+00:00");
    }

    #[test]
    fn test_parse_rfc2822() {
        let date = SentDate::parse("Tue, 5 Mar 2024 14:07:09 -0500").unwrap();
        assert_eq!(date.to_string(), "2024-03-05 14:07:09-05:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(SentDate::parse(""), None);
        assert_eq!(SentDate::parse("   "), None);
        assert_eq!(SentDate::parse("yesterday"), None);
        assert_eq!(SentDate::parse("2024-13-40"), None);
    }
}
