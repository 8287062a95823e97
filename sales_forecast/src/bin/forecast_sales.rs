//! Command-line forecast of next-day sales from a line-item CSV.

use anyhow::Context;
use chrono::{Duration, NaiveDate};
use clap::Parser;
use sales_forecast::{
    DataLoader, ForecastConfig, ForecastService, ForecastSink, InMemorySink, JsonLinesSink,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "forecast_sales")]
#[command(about = "Forecast next-day sales for a store", long_about = None)]
struct Cli {
    /// CSV file with date,product_id,quantity columns
    #[arg(short, long)]
    input: PathBuf,

    /// Store the forecast is recorded against
    #[arg(short, long, default_value = "1")]
    store_id: u64,

    /// Only count sales of this product
    #[arg(short, long)]
    product_id: Option<u64>,

    /// Configuration file (TOML); UMKM_FORECAST_* variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window width in days
    #[arg(long)]
    n_steps: Option<usize>,

    /// Training epochs
    #[arg(long)]
    epochs: Option<usize>,

    /// Date the forecast applies to (defaults to the day after the last sale)
    #[arg(long)]
    forecast_date: Option<NaiveDate>,

    /// Append the forecast record to this JSON-lines file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run<S: ForecastSink>(cli: &Cli, config: ForecastConfig, sink: S) -> anyhow::Result<()> {
    let series = DataLoader::daily_series(&cli.input, cli.product_id)
        .with_context(|| format!("failed to load sales from {}", cli.input.display()))?;
    tracing::info!(days = series.len(), "Sales history loaded");

    let forecast_date = match (cli.forecast_date, series.last_date()) {
        (Some(date), _) => date,
        (None, Some(last)) => last + Duration::days(1),
        (None, None) => anyhow::bail!("no sales found for the selected product"),
    };

    let mut service = ForecastService::new(config, sink)?;
    let record = service.generate(cli.store_id, cli.product_id, &series, forecast_date)?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sales_forecast=info,forecast_sales=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ForecastConfig::load(cli.config.as_deref())?;
    if let Some(n_steps) = cli.n_steps {
        config.n_steps = n_steps;
    }
    if let Some(epochs) = cli.epochs {
        config.epochs = epochs;
    }
    config.validate()?;
    tracing::info!(?config, "Configuration loaded");

    match &cli.output {
        Some(path) => run(&cli, config, JsonLinesSink::new(path)),
        None => run(&cli, config, InMemorySink::new()),
    }
}
