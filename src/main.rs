//! Site-Harvest main entry point
//!
//! This is the command-line interface for the Site-Harvest multi-site scraper.

use anyhow::{bail, Context};
use clap::Parser;
use site_harvest::config::{load_config_with_hash, Config, ExecutionMode};
use site_harvest::harvest::Orchestrator;
use site_harvest::output::{print_summary, ResultStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Harvest: a small multi-site scraper
///
/// Site-Harvest fetches each configured source with a randomized delay between
/// requests, extracts structured records with a per-source strategy, and
/// exports them as JSON plus a CSV summary. Without a config file the four
/// built-in demo sources are scraped.
#[derive(Parser, Debug)]
#[command(name = "site-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A small multi-site scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Scrape only the source with this id
    #[arg(long, value_name = "ID")]
    source: Option<String>,

    /// Scrape the selected source at this URL instead of its configured one
    #[arg(long, requires = "source")]
    url: Option<String>,

    /// Fetch sources concurrently
    #[arg(long)]
    parallel: bool,

    /// Override the JSON output path
    #[arg(long, value_name = "PATH")]
    json_out: Option<PathBuf>,

    /// Override the CSV summary output path
    #[arg(long, value_name = "PATH")]
    csv_out: Option<PathBuf>,

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Do not print the console summary
    #[arg(long)]
    no_summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration given, using built-in sources");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let store = handle_scrape(&cli, &config).await?;

    if store.is_empty() {
        tracing::warn!("No data was scraped successfully");
    }

    let json_path = cli
        .json_out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.json_path));
    let csv_path = cli
        .csv_out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.csv_path));
    write_outputs(&store, &json_path, &csv_path)?;

    if !cli.no_summary && !cli.quiet {
        print_summary(&store);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_harvest=info,warn"),
            1 => EnvFilter::new("site_harvest=debug,info"),
            2 => EnvFilter::new("site_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be scraped
fn handle_dry_run(config: &Config) {
    println!("=== Site-Harvest Dry Run ===\n");

    println!("Scraper Configuration:");
    println!(
        "  Delay between requests: {}s - {}s",
        config.scraper.min_delay, config.scraper.max_delay
    );
    println!("  Timeout: {}s", config.scraper.timeout);
    println!("  Mode: {:?}", config.scraper.mode);
    println!("  Max concurrency: {}", config.scraper.max_concurrency);
    println!("  Max retries: {}", config.scraper.max_retries);

    println!("\nIdentity:");
    println!("  User agent: {}", config.identity.user_agent);
    for (name, value) in &config.identity.headers {
        println!("  {}: {}", name, value);
    }

    println!("\nOutput:");
    println!("  JSON: {}", config.output.json_path);
    println!("  CSV summary: {}", config.output.csv_path);

    println!("\nSources ({}):", config.sources.len());
    for source in &config.sources {
        println!("  - {} [{}] {}", source.id(), source.kind(), source.url());
    }

    println!("\n✓ Configuration is valid");
}

/// Runs either the full batch or the single selected source
async fn handle_scrape(cli: &Cli, config: &Config) -> anyhow::Result<ResultStore> {
    let mut orchestrator = Orchestrator::new(config)?;
    if cli.parallel {
        orchestrator = orchestrator.with_mode(ExecutionMode::Parallel);
    }

    let Some(id) = &cli.source else {
        tracing::info!(
            "Starting scraping session over {} sources",
            config.sources.len()
        );
        return Ok(orchestrator.run_all(&config.sources).await);
    };

    let Some(source) = config.sources.iter().find(|s| s.id() == id) else {
        bail!("no source with id '{}' in configuration", id);
    };

    let url = cli.url.as_deref().unwrap_or(source.url());
    let record = orchestrator
        .run_one_at(source, url)
        .await
        .with_context(|| format!("{} failed", id))?;

    let mut store = ResultStore::new();
    store.append(record)?;
    Ok(store)
}

/// Writes the JSON export and CSV summary
fn write_outputs(store: &ResultStore, json_path: &Path, csv_path: &Path) -> anyhow::Result<()> {
    store
        .write_json(json_path)
        .with_context(|| format!("failed to write {}", json_path.display()))?;
    store
        .write_csv_summary(csv_path)
        .with_context(|| format!("failed to write {}", csv_path.display()))?;
    Ok(())
}
