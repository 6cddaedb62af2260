//! Headless browser session management
//!
//! One [`PageSession`] owns one Chromium process and one tab for the duration
//! of a single fetch attempt. Every call path that opens a session must close
//! it exactly once before returning; `close` consumes the session and never
//! propagates cleanup failures.

use crate::config::{BrowserConfig, TargetConfig};
use crate::extract::{build_extraction_script, RawItem};
use crate::{Result, ScrapeError};
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventResponseReceived, ResourceType, SetBlockedUrLsParams,
};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// URL patterns blocked when `block-resources` is enabled.
///
/// Blocking covers render-only resources; it must never remove the DOM nodes
/// the extraction selectors match.
const BLOCKED_RESOURCE_PATTERNS: &[&str] = &[
    "*.png", "*.jpg", "*.jpeg", "*.gif", "*.svg", "*.webp", "*.ico", "*.css", "*.woff",
    "*.woff2", "*.ttf", "*.otf",
];

/// Interval of the in-page readiness poll (milliseconds)
const READY_POLL_INTERVAL_MS: u64 = 500;

/// Headroom added on top of the configured ceilings for the CDP command
/// timeout, so the client never evicts a command that is still inside
/// its own budget
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

/// One browser-session lifecycle seam
///
/// [`PageSession`] is the production implementation; tests substitute scripted
/// sessions to exercise the retry machine without a browser.
#[allow(async_fn_in_trait)]
pub trait Session {
    /// Loads the target page and returns the HTTP status of the main response
    async fn navigate(&mut self) -> Result<i64>;

    /// Suspends until the readiness selector matches, or times out
    async fn wait_for_ready(&mut self) -> Result<()>;

    /// Runs the in-page extraction; only valid after `wait_for_ready` succeeded
    async fn extract(&mut self) -> Result<Vec<RawItem>>;

    /// Releases the session's resources; never fails, logs cleanup problems
    async fn close(self);
}

/// Opens fresh [`Session`]s, one per fetch attempt
#[allow(async_fn_in_trait)]
pub trait SessionFactory {
    type Session: Session;

    async fn open(&self) -> Result<Self::Session>;
}

/// Factory producing real Chromium-backed sessions
#[derive(Debug, Clone)]
pub struct PageSessionFactory {
    browser: BrowserConfig,
    target: TargetConfig,
}

impl PageSessionFactory {
    pub fn new(browser: BrowserConfig, target: TargetConfig) -> Self {
        Self { browser, target }
    }
}

impl SessionFactory for PageSessionFactory {
    type Session = PageSession;

    async fn open(&self) -> Result<PageSession> {
        PageSession::open(&self.browser, self.target.clone()).await
    }
}

/// A live headless Chromium session: one browser process, one tab
pub struct PageSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    target: TargetConfig,
    navigation_timeout: Duration,
    operation_timeout: Duration,
}

impl PageSession {
    /// Launches Chromium and prepares a configured blank tab
    ///
    /// Applies the user agent and, when enabled, the resource-blocking
    /// patterns before any navigation happens.
    pub async fn open(config: &BrowserConfig, target: TargetConfig) -> Result<Self> {
        let chrome_config = ChromeConfig::builder()
            .no_sandbox()
            .args(vec![
                "--disable-dev-shm-usage",
                "--disable-gpu",
                "--no-zygote",
                "--no-first-run",
                "--no-default-browser-check",
            ])
            .request_timeout(cdp_request_timeout(config))
            .build()
            .map_err(ScrapeError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(chrome_config).await?;

        // The handler stream must be polled for the CDP connection to make
        // progress; it runs until the connection drops or the task is aborted.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler finished: {}", e);
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        page.set_user_agent(config.user_agent.as_str()).await?;

        // The network domain must be enabled for response events, which is
        // where the main document's HTTP status comes from
        page.execute(EnableParams::default()).await?;

        if config.block_resources {
            let patterns = BLOCKED_RESOURCE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect();
            page.execute(SetBlockedUrLsParams::new(patterns)).await?;
        }

        Ok(Self {
            browser,
            page,
            handler_task,
            target,
            navigation_timeout: Duration::from_secs(config.navigation_timeout_secs),
            operation_timeout: Duration::from_secs(config.operation_timeout_secs),
        })
    }
}

impl Session for PageSession {
    async fn navigate(&mut self) -> Result<i64> {
        let url = self.target.url.clone();

        // Navigation is issued as a raw CDP command and the status read off
        // the main document's response event, bounded only by the configured
        // navigation timeout. The listener is subscribed before navigating so
        // the response cannot be missed.
        let navigation = async {
            let mut responses = self
                .page
                .event_listener::<EventResponseReceived>()
                .await?;

            let result = self.page.execute(NavigateParams::new(url.clone())).await?;
            if let Some(error) = &result.error_text {
                tracing::warn!("Navigation produced no response: {}", error);
                return classify_status(&url, None);
            }
            let loader_id = result.loader_id.clone();

            while let Some(event) = responses.next().await {
                if event.r#type != ResourceType::Document {
                    continue;
                }
                if let Some(id) = &loader_id {
                    if event.loader_id != *id {
                        continue;
                    }
                }
                return Ok(event.response.status);
            }

            classify_status(&url, None)
        };

        let status = tokio::time::timeout(self.navigation_timeout, navigation)
            .await
            .map_err(|_| ScrapeError::NavigationTimeout { url: url.clone() })??;

        classify_status(&url, Some(status))
    }

    async fn wait_for_ready(&mut self) -> Result<()> {
        let selector = self.target.item_selector.clone();
        let script = build_wait_script(&selector, self.operation_timeout);

        // The script bounds itself; the outer timeout only guards a hung
        // CDP connection.
        let guard = self.operation_timeout + Duration::from_secs(5);
        let evaluation = tokio::time::timeout(guard, self.page.evaluate(script))
            .await
            .map_err(|_| ScrapeError::ReadinessTimeout {
                selector: selector.clone(),
            })??;

        let found: bool = evaluation.into_value()?;
        if found {
            Ok(())
        } else {
            Err(ScrapeError::ReadinessTimeout { selector })
        }
    }

    async fn extract(&mut self) -> Result<Vec<RawItem>> {
        let script = build_extraction_script(
            &self.target.item_selector,
            &self.target.link_selector,
            &self.target.date_selector,
        );

        let evaluation = self.page.evaluate(script).await?;
        let items: Vec<RawItem> = evaluation.into_value()?;
        Ok(items)
    }

    async fn close(self) {
        if let Err(e) = self.page.close().await {
            tracing::warn!("Failed to close page: {}", e);
        }

        let mut browser = self.browser;
        if let Err(e) = browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = browser.wait().await {
            tracing::warn!("Failed to reap browser process: {}", e);
        }

        self.handler_task.abort();
    }
}

/// Computes the CDP command timeout from the configured ceilings
///
/// Both the navigation wait and the in-page readiness poll live inside a
/// single CDP command each; the client-side command timeout must outlast
/// whichever budget is larger, or the command is evicted before our own
/// deadline handling can classify the failure.
fn cdp_request_timeout(config: &BrowserConfig) -> Duration {
    let ceiling = config
        .navigation_timeout_secs
        .max(config.operation_timeout_secs);
    Duration::from_secs(ceiling) + REQUEST_TIMEOUT_MARGIN
}

/// Classifies the main response status of a navigation
///
/// 2xx/3xx pass; anything else, including no response at all (DNS or
/// connection failure), is a navigation failure for this attempt.
fn classify_status(url: &str, status: Option<i64>) -> Result<i64> {
    match status {
        Some(code) if (200..400).contains(&code) => Ok(code),
        other => Err(ScrapeError::NavigationFailed {
            url: url.to_string(),
            status: other,
        }),
    }
}

/// Builds the in-page polling script for the readiness selector
///
/// Cooperative wait: the page-side loop polls `querySelector` every
/// 500ms until the selector matches or the budget runs out, then resolves
/// to a bool. Only that bool crosses back over the evaluate boundary.
fn build_wait_script(selector: &str, timeout: Duration) -> String {
    // JSON-encode the selector so quoting inside it cannot break the script
    let selector = serde_json::to_string(selector).unwrap_or_default();
    let max_polls = (timeout.as_millis() as u64 / READY_POLL_INTERVAL_MS).max(1);

    format!(
        r#"(async () => {{
            for (let i = 0; i < {max_polls}; i++) {{
                if (document.querySelector({selector})) {{
                    return true;
                }}
                await new Promise((r) => setTimeout(r, {READY_POLL_INTERVAL_MS}));
            }}
            return false;
        }})()"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_script_embeds_selector_and_budget() {
        let script = build_wait_script(".items .item", Duration::from_secs(60));

        assert!(script.contains(r#"".items .item""#));
        // 60s at 500ms per poll
        assert!(script.contains("i < 120"));
    }

    #[test]
    fn test_wait_script_polls_at_least_once() {
        let script = build_wait_script(".item", Duration::from_millis(100));
        assert!(script.contains("i < 1"));
    }

    #[test]
    fn test_wait_script_escapes_quoted_selector() {
        let script = build_wait_script(r#"div[data-kind="duyuru"]"#, Duration::from_secs(1));
        assert!(script.contains(r#""div[data-kind=\"duyuru\"]""#));
    }

    #[test]
    fn test_cdp_request_timeout_outlasts_both_budgets() {
        let mut config = BrowserConfig::default();
        config.navigation_timeout_secs = 120;
        config.operation_timeout_secs = 60;
        assert_eq!(cdp_request_timeout(&config), Duration::from_secs(130));

        // The larger budget wins when the ceilings are swapped
        config.navigation_timeout_secs = 30;
        config.operation_timeout_secs = 90;
        assert_eq!(cdp_request_timeout(&config), Duration::from_secs(100));
    }

    #[test]
    fn test_classify_status_accepts_success_and_redirects() {
        const URL: &str = "https://www.ogm.gov.tr/tr/duyurular";
        assert_eq!(classify_status(URL, Some(200)).unwrap(), 200);
        assert_eq!(classify_status(URL, Some(304)).unwrap(), 304);
    }

    #[test]
    fn test_classify_status_rejects_errors_and_missing_response() {
        const URL: &str = "https://www.ogm.gov.tr/tr/duyurular";
        assert!(matches!(
            classify_status(URL, Some(503)).unwrap_err(),
            ScrapeError::NavigationFailed {
                status: Some(503),
                ..
            }
        ));
        assert!(matches!(
            classify_status(URL, None).unwrap_err(),
            ScrapeError::NavigationFailed { status: None, .. }
        ));
    }
}
