use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lead_dedup::{load_leads, write_change_logs, write_leads, LeadDeduplicator};

/// Deduplicate leads by _id and email, keeping the most recent entry.
#[derive(Parser, Debug)]
#[command(name = "lead-dedup")]
#[command(version)]
struct Cli {
    /// JSON file with the input leads
    input: PathBuf,

    /// Where to write the deduplicated leads
    #[arg(long, env = "LEAD_DEDUP_OUTPUT", default_value = "dedupedLeads.json")]
    output: PathBuf,

    /// Where to write leads missing _id or email
    #[arg(long, env = "LEAD_DEDUP_REJECTED", default_value = "BadJson.json")]
    rejected: PathBuf,

    /// Where to write the change log
    #[arg(long, env = "LEAD_DEDUP_CHANGE_LOG", default_value = "changeLog.txt")]
    change_log: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run_dedup(&cli)
}

fn run_dedup(cli: &Cli) -> Result<()> {
    // 1. Load
    let (leads, shape) = load_leads(&cli.input)?;
    info!(count = leads.len(), input = %cli.input.display(), "loaded leads");

    // 2. Deduplicate
    let mut deduplicator = LeadDeduplicator::new();
    deduplicator.process_leads(leads);
    let summary = deduplicator.summary();
    info!("{}", summary.summary());

    // 3. Write the three outputs
    write_leads(deduplicator.deduplicated_leads(), shape, &cli.output)?;
    write_leads(deduplicator.rejected_leads(), shape, &cli.rejected)?;
    write_change_logs(deduplicator.change_logs(), &cli.change_log)?;
    info!(
        output = %cli.output.display(),
        rejected = %cli.rejected.display(),
        change_log = %cli.change_log.display(),
        "wrote outputs"
    );

    println!("✅ Deduplication completed successfully: {}", summary.summary());

    Ok(())
}
