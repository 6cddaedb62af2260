//! Scrape pipeline: session lifecycle, bounded retries, orchestration
//!
//! The pipeline is strictly sequential: at most one browser session is open
//! at any instant, and the only suspension points are page navigation, the
//! readiness wait, and the inter-retry delay.

mod fetcher;
mod session;

pub use fetcher::RetryingFetcher;
pub use session::{PageSession, PageSessionFactory, Session, SessionFactory};

use crate::config::Config;
use crate::output::write_records;
use crate::Result;
use std::path::PathBuf;

/// Outcome of one scrape run
#[derive(Debug)]
pub enum ScrapeOutcome {
    /// Records were extracted and the output file was replaced
    Written { count: usize, path: PathBuf },

    /// The page rendered correctly but matched no announcements;
    /// the output file was left untouched
    Empty,
}

/// Runs a complete scrape: fetch with retries, then write or skip
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(ScrapeOutcome)` - The fetch succeeded; the outcome says whether
///   output was written
/// * `Err(ScrapeError)` - All attempts failed
pub async fn run(config: Config) -> Result<ScrapeOutcome> {
    let factory = PageSessionFactory::new(config.browser.clone(), config.target.clone());
    run_with_factory(&config, &factory).await
}

/// Orchestrates fetch-then-write-or-skip over any session factory
///
/// Holds the write-skip invariant: an empty result leaves the output file
/// untouched. Production goes through [`run`]; tests drive this directly
/// with scripted sessions.
pub async fn run_with_factory<F>(config: &Config, factory: &F) -> Result<ScrapeOutcome>
where
    F: SessionFactory,
{
    let fetcher = RetryingFetcher::new(&config.retry);

    let records = fetcher.fetch(factory, &config.target.base_origin).await?;

    if records.is_empty() {
        tracing::info!("No announcements extracted; output file left untouched");
        return Ok(ScrapeOutcome::Empty);
    }

    let path = PathBuf::from(&config.output.json_path);
    write_records(&records, &path)?;
    tracing::info!(
        count = records.len(),
        path = %path.display(),
        "Announcements written"
    );

    Ok(ScrapeOutcome::Written {
        count: records.len(),
        path,
    })
}
