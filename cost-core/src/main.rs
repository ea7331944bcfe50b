use anyhow::{Context, Result};
use clap::Parser;
use cost_core::batch::BatchProcessor;
use cost_core::config::resolve_rates;
use cost_core::error::JobFailure;
use cost_core::observability::{setup_logging, LogFormat};
use cost_core::report::{
    default_output_path, log_summary, read_jobs_from_path, write_results_to_path, write_summary,
    Summary,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "hpc-cloud-cost")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Estimate cloud cost of HPC jobs from Slurm accounting data", long_about = None)]
struct Cli {
    /// Pipe-delimited accounting dump (`sacct -P` output)
    input: PathBuf,

    /// Where to write per-job costs (default: <INPUT>.costs.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write totals and means as JSON
    #[arg(short, long)]
    summary: Option<PathBuf>,

    /// TOML file with provider seat rates (default: built-in table)
    #[arg(short, long)]
    rates: Option<PathBuf>,

    /// Price jobs on this many worker threads
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_format);

    let rates = resolve_rates(cli.rates.as_deref()).context("Failed to load rate table")?;

    let table = read_jobs_from_path(&cli.input)
        .with_context(|| format!("Failed to read accounting data from {}", cli.input.display()))?;
    info!(input = %cli.input.display(), rows = table.rows_read(), "Loaded accounting data");

    let rejected: Vec<JobFailure> = table.rejected;
    let processor = BatchProcessor::new(rates);
    let outcome = if cli.workers > 1 {
        processor
            .process_parallel(table.records, cli.workers)
            .await
            .context("Failed to price jobs")?
    } else {
        processor.process(&table.records)
    };

    let output = cli.output.unwrap_or_else(|| default_output_path(&cli.input));
    write_results_to_path(&output, processor.rates(), &outcome.rows)
        .with_context(|| format!("Failed to write results to {}", output.display()))?;
    info!(output = %output.display(), rows = outcome.rows.len(), "Wrote job costs");

    log_summary(&outcome.stats);

    if let Some(path) = cli.summary {
        let summary = Summary::new(&cli.input, &outcome, rejected.len());
        write_summary(&path, &summary)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        info!(summary = %path.display(), "Wrote summary");
    }

    Ok(())
}
