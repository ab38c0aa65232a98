//! `TicketLedger` - support inbox triage from the command line.
//!
//! Reads a CSV export of support emails, tags each one with issue categories
//! and a priority, and writes an enriched table, two summary tables and a
//! Markdown report.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for artifact paths.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticketledger=info,ticketledger_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.into_config();
    info!("Starting TicketLedger on {}", config.input.display());

    let summary = ticketledger_core::run(&config)
        .with_context(|| format!("triage of {} failed", config.input.display()))?;

    if summary.excluded > 0 {
        info!("{} rows excluded", summary.excluded);
    }

    println!("Enriched CSV: {}", summary.paths.enriched.display());
    println!(
        "Summary by category & priority: {}",
        summary.paths.summary.display()
    );
    println!("Sender summary: {}", summary.paths.senders.display());
    println!("Markdown report: {}", summary.paths.report.display());
    Ok(())
}
