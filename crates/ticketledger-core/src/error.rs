//! Error types for the core library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while triaging a batch of tickets.
#[derive(Debug, Error)]
pub enum Error {
    /// No input path was given.
    #[error("Input path is empty")]
    EmptyInputPath,

    /// The input file could not be opened or read.
    #[error("Cannot read input {}: {source}", path.display())]
    ReadInput {
        /// Offending path.
        path: PathBuf,
        /// Underlying cause.
        source: std::io::Error,
    },

    /// CSV decoding or encoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// One or more required columns are absent from the header row.
    #[error("Missing required column(s): {}", columns.join(", "))]
    MissingColumns {
        /// Names of every missing column.
        columns: Vec<String>,
    },

    /// A row failed validation under the strict row policy.
    #[error("Invalid row at line {line}: column `{column}` {reason} (value: {value:?})")]
    InvalidRow {
        /// One-based line number in the input file (header is line 1).
        line: u64,
        /// Column holding the bad value.
        column: String,
        /// The value as read.
        value: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A configured pattern is not a valid regular expression.
    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// Pattern source text.
        pattern: String,
        /// Regex compilation error.
        source: regex::Error,
    },

    /// A category name outside the fixed vocabulary.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// A priority name other than P1, P2 or P3.
    #[error("Unknown priority: {0}")]
    UnknownPriority(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The output directory could not be created.
    #[error("Cannot create output directory {}: {source}", path.display())]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying cause.
        source: std::io::Error,
    },

    /// An artifact could not be written.
    #[error("Cannot write {}: {source}", path.display())]
    WriteArtifact {
        /// Artifact path.
        path: PathBuf,
        /// Underlying cause.
        source: std::io::Error,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
