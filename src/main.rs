//! CLI entry point for the fuel price notifier.
//!
//! Provides subcommands for running the daily collection/notification batch,
//! inspecting current prices for one fuel type, and listing stored snapshots.

use anyhow::Result;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use fuel_price_notifier::analytics::outliers::remove_outliers;
use fuel_price_notifier::analytics::statistics::{
    REPRESENTATIVE_PERCENTILE, calculate_statistics, representative_price,
};
use fuel_price_notifier::config::{self, AppConfig};
use fuel_price_notifier::export::append_snapshot;
use fuel_price_notifier::fetch::BasicClient;
use fuel_price_notifier::fuel::fuel_name;
use fuel_price_notifier::infra::chat::ChatTipClient;
use fuel_price_notifier::infra::fpdapi::FuelPriceClient;
use fuel_price_notifier::infra::pushover::PushoverClient;
use fuel_price_notifier::pipeline::Pipeline;
use fuel_price_notifier::services::advisory::fetch_advisory;
use fuel_price_notifier::services::price_api::PriceApi;
use fuel_price_notifier::store::{DATE_FORMAT, DynamoStore, SnapshotRepo};

#[derive(Parser)]
#[command(name = "fuel_price_notifier")]
#[command(about = "Samples regional fuel prices, stores daily snapshots, and alerts subscribers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daily collection, storage, and notification batch
    Run {
        /// Run even on a day outside the configured notify days
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Fetch current prices for one fuel type and print statistics
    Prices {
        /// Provider fuel id (e.g. 2 = U91, 8 = U98)
        #[arg(value_name = "FUEL_ID")]
        fuel_id: u32,
    },
    /// Show the most recent stored snapshots
    History {
        /// Maximum number of snapshots to show
        #[arg(short, long, default_value_t = 7)]
        limit: usize,

        /// CSV file to append the snapshots to
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/fuel_price_notifier.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("fuel_price_notifier.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { force } => run_daily(force).await?,
        Commands::Prices { fuel_id } => show_prices(fuel_id).await?,
        Commands::History { limit, output } => show_history(limit, output).await?,
    }

    Ok(())
}

/// Builds the configuration and collaborators, then hands the day to the
/// pipeline.
#[tracing::instrument(fields(force))]
async fn run_daily(force: bool) -> Result<()> {
    let config = AppConfig::from_env()?;

    let today = config.schedule.today();
    let weekday = today.weekday();
    info!(%today, ?weekday, "starting daily run");

    if !force && !config.schedule.runs_on(weekday) {
        info!(?weekday, "unsuitable day of the week, nothing to do");
        return Ok(());
    }

    let advisory = fetch_advisory(
        &BasicClient::new(),
        &config.advisory.url,
        config.advisory.list_index,
    )
    .await?;
    info!(%advisory, "advisory paragraph scraped");

    let aws = aws_config::load_from_env().await;
    let store = DynamoStore::new(&aws, &config.table_name);

    let pipeline = Pipeline::new(
        config.users.clone(),
        FuelPriceClient::new(&config.fuel_api),
        store,
        ChatTipClient::new(&config.tips),
        PushoverClient::new(&config.pushover),
    );

    pipeline.run(today, &advisory).await?;

    info!("daily run finished");
    Ok(())
}

/// Fetches current samples for one fuel id and prints the reduction.
#[tracing::instrument(fields(fuel_id))]
async fn show_prices(fuel_id: u32) -> Result<()> {
    let client = FuelPriceClient::new(&config::FuelApiConfig::from_env()?);

    let raw = client.prices_for(fuel_id).await?;
    let cleaned = remove_outliers(&raw);

    if cleaned.is_empty() {
        warn!(fuel_id, "no prices available");
        return Ok(());
    }

    let stats = calculate_statistics(&cleaned, REPRESENTATIVE_PERCENTILE)?;
    info!(
        fuel = fuel_name(fuel_id),
        samples = raw.len(),
        kept = cleaned.len(),
        min = stats.min,
        mean = stats.mean,
        percentile = stats.percentile,
        representative = representative_price(fuel_id, &stats),
        "current price statistics"
    );

    Ok(())
}

/// Lists the most recent stored snapshots, optionally appending them to a
/// CSV file.
#[tracing::instrument(fields(limit))]
async fn show_history(limit: usize, output: Option<String>) -> Result<()> {
    let aws = aws_config::load_from_env().await;
    let repo = SnapshotRepo::new(DynamoStore::new(&aws, config::table_name_from_env()));

    let snapshots = repo.recent(limit).await?;
    info!(total = snapshots.len(), "snapshots fetched");

    for snapshot in &snapshots {
        info!(
            id = snapshot.id,
            date = %snapshot.date.format(DATE_FORMAT),
            u91 = ?snapshot.u91,
            u95 = ?snapshot.u95,
            u98 = ?snapshot.u98,
            diesel = ?snapshot.diesel,
            "snapshot"
        );

        if let Some(path) = &output {
            append_snapshot(path, snapshot)?;
        }
    }

    Ok(())
}
