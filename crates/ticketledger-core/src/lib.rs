//! # ticketledger-core
//!
//! Core triage logic for `TicketLedger` support inboxes.
//!
//! This crate provides:
//! - **Pattern Registry** - category and priority signal phrases
//! - **Classifier** - categories and a single priority per ticket
//! - **Aggregation** - totals by category/priority and by sender, duplicate bodies
//! - **Report** - a Markdown-style summary document
//! - CSV input/output and atomic artifact writing
//!
//! # Example
//!
//! ```
//! use ticketledger_core::{Classifier, Priority};
//!
//! let classifier = Classifier::default();
//! let result = classifier.classify("I was charged twice, please refund");
//!
//! assert_eq!(result.categories.label(), "billing_error");
//! assert_eq!(result.priority, Priority::P2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod aggregate;
mod classifier;
pub mod config;
pub mod dataset;
mod error;
pub mod output;
pub mod pipeline;
mod record;
pub mod registry;
pub mod report;

pub use aggregate::{CategorySummary, DuplicateGroup, SenderSummary};
pub use classifier::{Classification, Classifier};
pub use config::{RunConfig, RunConfigBuilder};
pub use dataset::{ExcludedRow, Extraction, RowPolicy, Table};
pub use error::{Error, Result};
pub use output::{ArtifactPaths, Artifacts};
pub use pipeline::{RunSummary, Triage, build_artifacts, run};
pub use record::{ClassifiedRecord, Record, SentDate};
pub use registry::{Categories, Category, Pattern, PatternRegistry, Priority};
