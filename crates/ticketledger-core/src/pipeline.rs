//! End-to-end triage run.
//!
//! Input table → per-record classification → batch aggregation → report.
//! Everything up to [`Artifacts`] is computed in memory; the filesystem is
//! only touched to read the input and, once every artifact is ready, to
//! write them.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::Result;
use crate::aggregate::{
    find_duplicate_bodies, group_by_category_priority, group_by_sender_category_priority,
};
use crate::classifier::Classifier;
use crate::config::RunConfig;
use crate::dataset::{ExcludedRow, RowPolicy, Table, sender_csv, summary_csv};
use crate::output::{ArtifactPaths, Artifacts};
use crate::report;

/// Artifacts plus counters describing how they were produced.
#[derive(Debug, Clone)]
pub struct Triage {
    /// Serialized outputs.
    pub artifacts: Artifacts,
    /// Records that were classified.
    pub records: usize,
    /// Rows dropped under the lenient policy.
    pub excluded: Vec<ExcludedRow>,
    /// Number of duplicate-body groups found.
    pub duplicate_groups: usize,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Where the artifacts were written.
    pub paths: ArtifactPaths,
    /// Records that were classified.
    pub records: usize,
    /// Rows dropped under the lenient policy.
    pub excluded: usize,
    /// Number of duplicate-body groups found.
    pub duplicate_groups: usize,
}

/// Classifies, aggregates and serializes a table without touching disk.
///
/// # Errors
///
/// Returns an error if a row is invalid under [`RowPolicy::Strict`] or if
/// CSV encoding fails.
pub fn build_artifacts(
    table: &Table,
    classifier: &Classifier,
    policy: RowPolicy,
    generated_at: DateTime<Utc>,
) -> Result<Triage> {
    let extraction = table.extract(policy)?;
    if !extraction.excluded.is_empty() {
        warn!(
            "Excluded {} of {} rows with invalid fields",
            extraction.excluded.len(),
            table.len()
        );
    }

    let classified = classifier.classify_batch(extraction.records);

    let summary = group_by_category_priority(&classified);
    let senders = group_by_sender_category_priority(&classified);
    let duplicates = find_duplicate_bodies(&classified);
    info!(
        "Classified {} tickets into {} category/priority groups, {} duplicate bodies",
        classified.len(),
        summary.len(),
        duplicates.len()
    );

    let artifacts = Artifacts {
        enriched: table.enriched_csv(&extraction.rows, &classified)?,
        summary: summary_csv(&summary)?,
        senders: sender_csv(&senders)?,
        report: report::render(&summary, &duplicates, generated_at),
    };

    Ok(Triage {
        artifacts,
        records: classified.len(),
        excluded: extraction.excluded,
        duplicate_groups: duplicates.len(),
    })
}

/// Runs the full pipeline described by `config`.
///
/// Nothing is written unless every artifact was built successfully.
///
/// # Errors
///
/// Returns an error for unreadable input, missing columns, invalid rows
/// (strict policy), an invalid pattern file, or a failed write.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let classifier = Classifier::new(config.registry()?);
    let table = Table::read_path(&config.input)?;
    if table.is_empty() {
        warn!("{} has a header but no rows", config.input.display());
    } else {
        info!("Loaded {} rows from {}", table.len(), config.input.display());
    }

    let triage = build_artifacts(&table, &classifier, config.row_policy, config.timestamp())?;
    let paths = triage.artifacts.write_to(&config.out_dir)?;
    info!("Wrote artifacts to {}", config.out_dir.display());

    Ok(RunSummary {
        paths,
        records: triage.records,
        excluded: triage.excluded.len(),
        duplicate_groups: triage.duplicate_groups,
    })
}
