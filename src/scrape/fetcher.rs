//! Bounded-retry fetch orchestration
//!
//! [`RetryingFetcher`] drives repeated fetch attempts over fresh sessions.
//! Each attempt opens its own session (a session that failed once is assumed
//! possibly corrupted and is never reused), and the session is closed exactly
//! once on every exit path. Navigation failures, readiness timeouts and
//! extraction errors are all transient: they burn one attempt and the next
//! one starts after a fixed delay. A page that renders but matches zero
//! items is a successful attempt and is never retried.

use crate::config::RetryConfig;
use crate::extract::{collect_records, AnnouncementRecord};
use crate::scrape::session::{Session, SessionFactory};
use crate::{Result, ScrapeError};
use std::time::Duration;

/// Retry state machine over [`SessionFactory`]-produced sessions
#[derive(Debug, Clone)]
pub struct RetryingFetcher {
    max_attempts: u32,
    delay: Duration,
}

impl RetryingFetcher {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            // Config validation rejects 0, but this constructor is public;
            // at least one attempt always runs
            max_attempts: config.max_attempts.max(1),
            delay: Duration::from_millis(config.delay_ms),
        }
    }

    /// Fetches and extracts the announcement list, retrying transient failures
    ///
    /// Returns the first successful attempt's records (possibly empty), or
    /// [`ScrapeError::RetryExhausted`] wrapping the last attempt's error once
    /// all attempts are spent.
    pub async fn fetch<F>(&self, factory: &F, base_origin: &str) -> Result<Vec<AnnouncementRecord>>
    where
        F: SessionFactory,
    {
        for attempt in 1..=self.max_attempts {
            tracing::info!(attempt, max = self.max_attempts, "Starting fetch attempt");

            let error = match self.run_attempt(factory, base_origin).await {
                Ok(records) => {
                    tracing::info!(attempt, records = records.len(), "Fetch attempt succeeded");
                    return Ok(records);
                }
                Err(e) => e,
            };

            tracing::warn!(attempt, error = %error, "Fetch attempt failed");

            if attempt == self.max_attempts {
                return Err(ScrapeError::RetryExhausted {
                    attempts: attempt,
                    source: Box::new(error),
                });
            }

            tracing::info!(delay_ms = self.delay.as_millis() as u64, "Retrying after delay");
            tokio::time::sleep(self.delay).await;
        }

        unreachable!("max-attempts is validated to be >= 1")
    }

    /// Runs one attempt against a fresh session
    ///
    /// The session is closed before this returns, whatever the outcome.
    async fn run_attempt<F>(&self, factory: &F, base_origin: &str) -> Result<Vec<AnnouncementRecord>>
    where
        F: SessionFactory,
    {
        let mut session = factory.open().await?;
        let result = drive(&mut session, base_origin).await;
        session.close().await;
        result
    }
}

/// The happy path of one attempt: navigate, wait, extract, normalize
async fn drive<S: Session>(session: &mut S, base_origin: &str) -> Result<Vec<AnnouncementRecord>> {
    let status = session.navigate().await?;
    tracing::debug!(status, "Navigation complete");

    session.wait_for_ready().await?;
    let items = session.extract().await?;
    tracing::debug!(items = items.len(), "Extraction pass complete");

    Ok(collect_records(items, base_origin))
}
