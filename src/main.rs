use analytics::compute_growth;
use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::Config;
use core_types::{ReferenceRate, ResultTable};
use data_client::{FredClient, YahooClient};
use exporter::{read_performance, CsvExporter};
use pipeline::BatchRunner;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// The main entry point for the tidemark analytics application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; the FRED API key may come from the real environment.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => handle_run(args).await,
        Commands::Growth(args) => handle_growth(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Risk/return statistics for instruments around event dates, measured
/// against a risk-free benchmark.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full batch: fetch, compute, and export both tables.
    Run(RunArgs),
    /// Recompute the growth table from an existing performance CSV.
    Growth(GrowthArgs),
}

#[derive(Parser)]
struct RunArgs {
    /// Path of the configuration file (without the .toml extension).
    #[arg(long, default_value = "config")]
    config: String,

    /// Override the configured window length in calendar months.
    #[arg(long)]
    window_length: Option<u32>,

    /// Override the configured output directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Parser)]
struct GrowthArgs {
    /// Path of a previously exported performance CSV.
    #[arg(long)]
    input: PathBuf,

    /// Directory for the growth CSV (defaults to the input's directory).
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Handles the orchestration of a full analysis batch.
async fn handle_run(args: RunArgs) -> anyhow::Result<()> {
    let mut config = configuration::load_config(&args.config)
        .context("failed to load configuration")?;
    if let Some(months) = args.window_length {
        config.window_length_months = months;
    }
    if let Some(dir) = args.output_dir {
        config.output.directory = dir;
    }

    println!(
        "Analyzing {} instruments across {} event dates ({}-month windows)",
        config.instruments.len(),
        config.event_dates.len(),
        config.window_length_months
    );

    let market = Arc::new(YahooClient::new(&config.fetch)?);
    let macro_provider = Arc::new(FredClient::new(&config.fetch, macro_api_key(&config)?)?);
    let exporter = CsvExporter::new(config.output.directory.clone());

    let runner = BatchRunner::new(market, macro_provider, config);
    let table = runner.run().await;

    let performance_path = exporter.export_performance(&table)?;
    let growth = compute_growth(&table);
    let growth_path = exporter.export_growth(&growth)?;

    print_summary(&table);
    println!("Performance table: {}", performance_path.display());
    println!("Growth table: {}", growth_path.display());
    Ok(())
}

/// Recomputes post-minus-pre deltas from a previously exported table.
fn handle_growth(args: GrowthArgs) -> anyhow::Result<()> {
    let table = read_performance(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let growth = compute_growth(&table);

    let output_dir = args
        .output_dir
        .or_else(|| args.input.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let path = CsvExporter::new(output_dir).export_growth(&growth)?;

    println!("Growth table ({} rows): {}", growth.len(), path.display());
    Ok(())
}

/// Resolves the macro provider's API key when the reference needs one.
fn macro_api_key(config: &Config) -> anyhow::Result<String> {
    match &config.reference {
        ReferenceRate::MacroSeries { .. } => config
            .fetch
            .macro_api_key
            .clone()
            .or_else(|| std::env::var("FRED_API_KEY").ok())
            .context("the reference is a macro series but no FRED API key is configured"),
        // The macro provider is never called for a tradable reference.
        ReferenceRate::Instrument { .. } => {
            Ok(config.fetch.macro_api_key.clone().unwrap_or_default())
        }
    }
}

/// Renders a per-record terminal summary of the finished batch.
fn print_summary(table: &ResultTable) {
    let mut summary = comfy_table::Table::new();
    summary.set_header(vec![
        "Instrument",
        "Event",
        "Period",
        "Ann. avg return",
        "Sharpe",
        "Outcome",
    ]);

    for record in table.records() {
        let row = match record.outcome.stats() {
            Some(bundle) => vec![
                record.instrument.clone(),
                record.event_date.to_string(),
                record.window_type.label().to_string(),
                format!("{:.4}", bundle.avg_return),
                format!("{:.3}", bundle.sharpe_ratio),
                "ok".to_string(),
            ],
            None => vec![
                record.instrument.clone(),
                record.event_date.to_string(),
                record.window_type.label().to_string(),
                "-".to_string(),
                "-".to_string(),
                "no data".to_string(),
            ],
        };
        summary.add_row(row);
    }

    println!("{summary}");
}
