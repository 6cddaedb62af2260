//! Duyuru-Scrape main entry point
//!
//! Command-line interface for the announcement scraper.

use clap::Parser;
use duyuru_scrape::config::load_config_with_hash;
use duyuru_scrape::scrape::{run, ScrapeOutcome};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Duyuru-Scrape: headless-browser announcement scraper
///
/// Renders one dynamically-built announcements page in headless Chromium,
/// extracts title/link/date records, and replaces the JSON output file.
/// Transient failures (network errors, slow rendering) are retried with a
/// fixed delay before the run is declared failed.
#[derive(Parser, Debug)]
#[command(name = "duyuru-scrape")]
#[command(version = "0.1.0")]
#[command(about = "Scrapes announcements from a dynamically-rendered page", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without launching a browser
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
        return Ok(());
    }

    handle_scrape(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("duyuru_scrape=info,warn"),
            1 => EnvFilter::new("duyuru_scrape=debug,info"),
            2 => EnvFilter::new("duyuru_scrape=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be scraped
fn handle_dry_run(config: &duyuru_scrape::config::Config, config_hash: &str) {
    println!("=== Duyuru-Scrape Dry Run ===\n");

    println!("Target:");
    println!("  URL: {}", config.target.url);
    println!("  Base origin: {}", config.target.base_origin);
    println!("  Item selector: {}", config.target.item_selector);
    println!("  Link selector: {}", config.target.link_selector);
    println!("  Date selector: {}", config.target.date_selector);

    println!("\nRetry Policy:");
    println!("  Max attempts: {}", config.retry.max_attempts);
    println!("  Delay between attempts: {}ms", config.retry.delay_ms);

    println!("\nBrowser:");
    println!("  User agent: {}", config.browser.user_agent);
    println!(
        "  Navigation timeout: {}s",
        config.browser.navigation_timeout_secs
    );
    println!(
        "  Operation timeout: {}s",
        config.browser.operation_timeout_secs
    );
    println!("  Block resources: {}", config.browser.block_resources);

    println!("\nOutput:");
    println!("  JSON file: {}", config.output.json_path);

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
}

/// Handles the main scrape operation and maps its outcome to the exit status
async fn handle_scrape(
    config: duyuru_scrape::config::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Scraping {} (max {} attempts)",
        config.target.url,
        config.retry.max_attempts
    );

    match run(config).await {
        Ok(ScrapeOutcome::Written { count, path }) => {
            tracing::info!("Wrote {} announcements to {}", count, path.display());
            Ok(())
        }
        Ok(ScrapeOutcome::Empty) => {
            // A rendered page with zero announcements is a successful run
            tracing::info!("No announcements found; nothing written");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
