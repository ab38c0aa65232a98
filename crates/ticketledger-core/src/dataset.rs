//! Tabular input and output.
//!
//! Input is a CSV file with a header row. `sender`, `body` and `sent_date`
//! must be present; `subject` may be omitted. Any other columns are carried
//! through to the enriched table unchanged.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator, Writer, WriterBuilder};
use tracing::{debug, warn};

use crate::aggregate::{CategorySummary, SenderSummary};
use crate::record::{ClassifiedRecord, Record, SentDate};
use crate::{Error, Result};

/// Sender column.
pub const SENDER: &str = "sender";
/// Subject column (optional).
pub const SUBJECT: &str = "subject";
/// Body column.
pub const BODY: &str = "body";
/// Timestamp column.
pub const SENT_DATE: &str = "sent_date";

/// Columns that must exist in the header row.
pub const REQUIRED_COLUMNS: [&str; 3] = [SENDER, BODY, SENT_DATE];

/// What to do with rows that fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPolicy {
    /// Abort the run on the first invalid row.
    #[default]
    Strict,
    /// Drop invalid rows from every output and report how many were dropped.
    Lenient,
}

/// A row that was dropped under [`RowPolicy::Lenient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedRow {
    /// Line number in the source file.
    pub line: u64,
    /// Column holding the bad value.
    pub column: &'static str,
    /// Why the row was dropped.
    pub reason: &'static str,
}

/// Records pulled out of a [`Table`].
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Valid records in input order.
    pub records: Vec<Record>,
    /// Source rows backing `records`, index-aligned.
    pub rows: Vec<StringRecord>,
    /// Rows dropped under the lenient policy.
    pub excluded: Vec<ExcludedRow>,
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    sender: usize,
    subject: Option<usize>,
    body: usize,
    sent_date: usize,
}

/// An input table held fully in memory.
#[derive(Debug, Clone)]
pub struct Table {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    columns: Columns,
}

impl Table {
    /// Reads a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty or unreadable, the CSV is
    /// malformed, or required columns are missing.
    pub fn read_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::EmptyInputPath);
        }
        let file = std::fs::File::open(path).map_err(|e| Error::ReadInput {
            path: path.to_path_buf(),
            source: e,
        })?;
        let table = Self::from_reader(file)?;
        debug!("Read {} rows from {}", table.len(), path.display());
        Ok(table)
    }

    /// Reads CSV from any reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV is malformed or required columns are
    /// missing.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = reader.headers()?.clone();
        let columns = resolve_columns(&headers)?;
        let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            headers,
            rows,
            columns,
        })
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Validates each row and builds records.
    ///
    /// A row is invalid when its sender is empty or its `sent_date` is
    /// empty or unparseable.
    ///
    /// # Errors
    ///
    /// Under [`RowPolicy::Strict`], returns [`Error::InvalidRow`] for the
    /// first invalid row.
    pub fn extract(&self, policy: RowPolicy) -> Result<Extraction> {
        let mut extraction = Extraction::default();

        for (index, row) in self.rows.iter().enumerate() {
            let line = row
                .position()
                .map_or(index as u64 + 2, csv::Position::line);

            match self.record(row, line) {
                Ok(record) => {
                    extraction.records.push(record);
                    extraction.rows.push(row.clone());
                }
                Err((column, reason)) => match policy {
                    RowPolicy::Strict => {
                        return Err(Error::InvalidRow {
                            line,
                            column: column.to_string(),
                            value: self.cell(row, column).to_string(),
                            reason: reason.to_string(),
                        });
                    }
                    RowPolicy::Lenient => {
                        warn!(line, column, reason, "Excluding row");
                        extraction.excluded.push(ExcludedRow {
                            line,
                            column,
                            reason,
                        });
                    }
                },
            }
        }

        Ok(extraction)
    }

    fn record(
        &self,
        row: &StringRecord,
        line: u64,
    ) -> std::result::Result<Record, (&'static str, &'static str)> {
        let sender = row.get(self.columns.sender).unwrap_or_default();
        if sender.trim().is_empty() {
            return Err((SENDER, "is empty"));
        }

        let raw_date = row.get(self.columns.sent_date).unwrap_or_default();
        if raw_date.trim().is_empty() {
            return Err((SENT_DATE, "is empty"));
        }
        let sent_date = SentDate::parse(raw_date).ok_or((SENT_DATE, "is not a timestamp"))?;

        Ok(Record {
            line,
            sender: sender.to_string(),
            subject: self
                .columns
                .subject
                .and_then(|i| row.get(i))
                .unwrap_or_default()
                .to_string(),
            body: row.get(self.columns.body).unwrap_or_default().to_string(),
            sent_date,
        })
    }

    fn cell<'a>(&self, row: &'a StringRecord, column: &str) -> &'a str {
        let index = match column {
            SENDER => Some(self.columns.sender),
            SENT_DATE => Some(self.columns.sent_date),
            BODY => Some(self.columns.body),
            _ => self.columns.subject,
        };
        index.and_then(|i| row.get(i)).unwrap_or_default()
    }

    /// Serializes the enriched table: original columns with `sent_date`
    /// normalized, followed by `text`, `categories` and `priority`.
    ///
    /// # Errors
    ///
    /// Returns an error if CSV encoding fails.
    pub fn enriched_csv(
        &self,
        rows: &[StringRecord],
        classified: &[ClassifiedRecord],
    ) -> Result<Vec<u8>> {
        let mut writer = writer();

        let mut header: Vec<&str> = self.headers.iter().collect();
        header.extend(["text", "categories", "priority"]);
        writer.write_record(&header)?;

        for (row, ticket) in rows.iter().zip(classified) {
            let sent_date = ticket.record.sent_date.to_string();
            let categories = ticket.categories.label();
            let mut out: Vec<&str> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    if i == self.columns.sent_date {
                        sent_date.as_str()
                    } else {
                        cell
                    }
                })
                .collect();
            // Ragged rows are padded or cut to the header width.
            out.resize(self.headers.len(), "");
            out.extend([
                ticket.text.as_str(),
                categories.as_str(),
                ticket.priority.as_str(),
            ]);
            writer.write_record(&out)?;
        }

        finish(writer)
    }
}

/// Serializes the `categories,priority,count` table.
///
/// # Errors
///
/// Returns an error if CSV encoding fails.
pub fn summary_csv(summary: &[CategorySummary]) -> Result<Vec<u8>> {
    let mut writer = writer();
    writer.write_record(["categories", "priority", "count"])?;
    for row in summary {
        writer.write_record([
            row.categories.label(),
            row.priority.to_string(),
            row.count.to_string(),
        ])?;
    }
    finish(writer)
}

/// Serializes the `sender,categories,priority,count` table.
///
/// # Errors
///
/// Returns an error if CSV encoding fails.
pub fn sender_csv(summary: &[SenderSummary]) -> Result<Vec<u8>> {
    let mut writer = writer();
    writer.write_record(["sender", "categories", "priority", "count"])?;
    for row in summary {
        writer.write_record([
            row.sender.clone(),
            row.categories.label(),
            row.priority.to_string(),
            row.count.to_string(),
        ])?;
    }
    finish(writer)
}

fn writer() -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| Error::Csv(csv::Error::from(e.into_error())))
}

fn resolve_columns(headers: &StringRecord) -> Result<Columns> {
    let find = |name: &str| headers.iter().position(|h| h.trim() == name);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .into_iter()
        .filter(|name| find(*name).is_none())
        .map(ToString::to_string)
        .collect();

    match (find(SENDER), find(BODY), find(SENT_DATE)) {
        (Some(sender), Some(body), Some(sent_date)) => Ok(Columns {
            sender,
            subject: find(SUBJECT),
            body,
            sent_date,
        }),
        _ => Err(Error::MissingColumns { columns: missing }),
    }
}
