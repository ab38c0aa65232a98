//! Command-line arguments.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;
use ticketledger_core::config::{DEFAULT_INPUT, DEFAULT_OUT_DIR};
use ticketledger_core::{RowPolicy, RunConfig};

#[derive(Debug, Parser)]
#[command(name = "ticketledger")]
#[command(about = "Support triage helper", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Input CSV with sender, subject, body and sent_date columns
    #[arg(long, env = "TICKETLEDGER_CSV", default_value = DEFAULT_INPUT)]
    pub csv: PathBuf,

    /// Directory for the enriched table, summaries and report
    #[arg(long, env = "TICKETLEDGER_OUT_DIR", default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// JSON file replacing the built-in category and priority patterns
    #[arg(long, env = "TICKETLEDGER_PATTERNS")]
    pub patterns: Option<PathBuf>,

    /// Skip rows with an empty sender or bad sent_date instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Fixed report timestamp (RFC 3339), for reproducible output
    #[arg(long, value_parser = parse_timestamp)]
    pub generated_at: Option<DateTime<Utc>>,
}

impl Cli {
    pub fn into_config(self) -> RunConfig {
        let mut builder = RunConfig::builder()
            .input(&self.csv)
            .out_dir(&self.out_dir)
            .row_policy(if self.lenient {
                RowPolicy::Lenient
            } else {
                RowPolicy::Strict
            });
        if let Some(patterns) = &self.patterns {
            builder = builder.patterns(patterns);
        }
        if let Some(at) = self.generated_at {
            builder = builder.generated_at(at);
        }
        builder.build()
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}
