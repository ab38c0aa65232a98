//! Run configuration.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::Result;
use crate::dataset::RowPolicy;
use crate::registry::PatternRegistry;

/// Default input table.
pub const DEFAULT_INPUT: &str = "data/emails.csv";
/// Default output directory.
pub const DEFAULT_OUT_DIR: &str = "outputs";

/// Settings for one triage run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Input CSV path.
    pub input: PathBuf,
    /// Directory receiving the artifacts.
    pub out_dir: PathBuf,
    /// Handling of invalid rows.
    pub row_policy: RowPolicy,
    /// Custom pattern file; the built-in tables are used when `None`.
    pub patterns: Option<PathBuf>,
    /// Report timestamp; the current time is used when `None`.
    pub generated_at: Option<DateTime<Utc>>,
}

impl RunConfig {
    /// Creates a configuration with every default.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::new()
    }

    /// Loads the configured pattern registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern file is configured and cannot be loaded.
    pub fn registry(&self) -> Result<PatternRegistry> {
        match &self.patterns {
            Some(path) => PatternRegistry::load(path),
            None => Ok(PatternRegistry::builtin()),
        }
    }

    /// The report timestamp: the fixed one if set, otherwise now.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.generated_at.unwrap_or_else(Utc::now)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug, Clone)]
pub struct RunConfigBuilder {
    input: PathBuf,
    out_dir: PathBuf,
    row_policy: RowPolicy,
    patterns: Option<PathBuf>,
    generated_at: Option<DateTime<Utc>>,
}

impl RunConfigBuilder {
    /// Creates a builder with the default paths and strict row policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            row_policy: RowPolicy::Strict,
            patterns: None,
            generated_at: None,
        }
    }

    /// Sets the input CSV path.
    #[must_use]
    pub fn input(mut self, path: impl AsRef<Path>) -> Self {
        self.input = path.as_ref().to_path_buf();
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn out_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.out_dir = path.as_ref().to_path_buf();
        self
    }

    /// Sets the row policy.
    #[must_use]
    pub const fn row_policy(mut self, policy: RowPolicy) -> Self {
        self.row_policy = policy;
        self
    }

    /// Uses patterns from a JSON file instead of the built-in tables.
    #[must_use]
    pub fn patterns(mut self, path: impl AsRef<Path>) -> Self {
        self.patterns = Some(path.as_ref().to_path_buf());
        self
    }

    /// Pins the report timestamp.
    #[must_use]
    pub const fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> RunConfig {
        RunConfig {
            input: self.input,
            out_dir: self.out_dir,
            row_policy: self.row_policy,
            patterns: self.patterns,
            generated_at: self.generated_at,
        }
    }
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
