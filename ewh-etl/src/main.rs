//! ewh-etl - Enterprise warehouse sales pipeline
//!
//! Extracts the raw sales CSV, quarantines rows failing quality rules,
//! models the rest into `dim_product` / `fact_sales`, and loads both into
//! the SQLite warehouse.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ewh_common::config::{load_config, ConfigOrigin, TomlConfig};
use ewh_common::db::open_warehouse_readonly;
use ewh_etl::logging::init_tracing;
use ewh_etl::pipeline::Pipeline;
use ewh_etl::report::{format_report, revenue_by_category};
use ewh_etl::sample::write_sample_csv;
use ewh_etl::sink::{CsvQuarantineSink, SqliteWarehouse};
use ewh_etl::source::CsvRecordSource;
use ewh_etl::TracingObserver;
use tracing::{error, info, warn};

/// Command-line arguments for ewh-etl
#[derive(Parser, Debug)]
#[command(name = "ewh-etl")]
#[command(about = "Sales star schema pipeline for the enterprise warehouse")]
#[command(version)]
struct Cli {
    /// Configuration file (overrides EWH_CONFIG and default locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Raw input CSV
    #[arg(long, global = true, env = "EWH_RAW_FILE")]
    raw_file: Option<PathBuf>,

    /// Quarantine side file
    #[arg(long, global = true, env = "EWH_QUARANTINE_FILE")]
    quarantine_file: Option<PathBuf>,

    /// SQLite warehouse database
    #[arg(long, global = true, env = "EWH_DATABASE")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Write the sample raw CSV
    Generate,
    /// Run the pipeline once
    Run,
    /// Print revenue by category from the warehouse
    Report,
    /// Generate sample data, run the pipeline, then print the report
    Demo,
}

/// Effective destinations after CLI / env overrides
struct Destinations {
    raw_file: PathBuf,
    quarantine_file: PathBuf,
    database: PathBuf,
}

impl Destinations {
    fn resolve(cli: &Cli, config: &TomlConfig) -> Self {
        Self {
            raw_file: cli.raw_file.clone().unwrap_or_else(|| config.raw_file()),
            quarantine_file: cli
                .quarantine_file
                .clone()
                .unwrap_or_else(|| config.quarantine_file()),
            database: cli.database.clone().unwrap_or_else(|| config.database()),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let config = loaded.config;

    let _log_guard = init_tracing(&config.logging.level, config.log_file().as_deref())?;

    info!(
        "Starting ewh-etl v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &loaded.origin {
        ConfigOrigin::CompiledDefaults => {
            warn!("No configuration file found, using compiled defaults");
        }
        origin => {
            if let Some(path) = origin.path() {
                info!("Configuration: {}", path.display());
            }
        }
    }

    let destinations = Destinations::resolve(&cli, &config);

    let result = match cli.command {
        Command::Generate => generate(&destinations).await,
        Command::Run => run_pipeline(&destinations).await,
        Command::Report => report(&destinations.database).await,
        Command::Demo => demo(&destinations).await,
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

async fn generate(destinations: &Destinations) -> Result<()> {
    write_sample_csv(&destinations.raw_file).context("Failed to generate sample data")?;
    Ok(())
}

async fn run_pipeline(destinations: &Destinations) -> Result<()> {
    let source = CsvRecordSource::new(&destinations.raw_file);
    let quarantine = CsvQuarantineSink::new(&destinations.quarantine_file);
    let storage = SqliteWarehouse::at_path(&destinations.database);
    let observer = TracingObserver;

    let summary = Pipeline::new(&source, &quarantine, &storage)
        .with_observer(&observer)
        .run()
        .await
        .context("Pipeline run failed");
    storage.close().await;
    let summary = summary?;

    info!(
        run_id = %summary.run_id,
        extracted = summary.extracted,
        valid = summary.valid,
        quarantined = summary.quarantined,
        dimension_rows = summary.dimension_rows,
        fact_rows = summary.fact_rows,
        "ETL pipeline completed successfully"
    );
    Ok(())
}

async fn report(database: &Path) -> Result<()> {
    let pool = open_warehouse_readonly(database)
        .await
        .context("Failed to open warehouse for reporting")?;
    let rows = revenue_by_category(&pool)
        .await
        .context("Reporting query failed")?;
    pool.close().await;

    println!("\n--- ANALYTICS REPORT: Revenue by Category (Joined Data) ---");
    print!("{}", format_report(&rows));
    Ok(())
}

async fn demo(destinations: &Destinations) -> Result<()> {
    generate(destinations).await?;
    run_pipeline(destinations).await?;
    report(&destinations.database).await
}
