use serde::Deserialize;

/// Main configuration structure for Duyuru-Scrape
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub target: TargetConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    pub output: OutputConfig,
}

/// Target page configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// URL of the announcements page
    pub url: String,

    /// Origin used to absolutize path-absolute hrefs.
    /// Defaults to the origin of `url`.
    #[serde(rename = "base-origin", default)]
    pub base_origin: String,

    /// Selector matching one announcement item; doubles as the readiness
    /// condition (the page is ready once at least one item exists)
    #[serde(rename = "item-selector")]
    pub item_selector: String,

    /// Selector for the title/link element inside an item
    #[serde(rename = "link-selector", default = "default_link_selector")]
    pub link_selector: String,

    /// Selector for the date container inside an item
    #[serde(rename = "date-selector", default = "default_date_selector")]
    pub date_selector: String,
}

/// Retry policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of fetch attempts
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// User agent string presented to the target site
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Ceiling for page navigation (seconds)
    #[serde(
        rename = "navigation-timeout-secs",
        default = "default_navigation_timeout"
    )]
    pub navigation_timeout_secs: u64,

    /// Ceiling for the readiness wait and other per-page operations (seconds)
    #[serde(
        rename = "operation-timeout-secs",
        default = "default_operation_timeout"
    )]
    pub operation_timeout_secs: u64,

    /// Block images/stylesheets/fonts to speed up rendering
    #[serde(rename = "block-resources", default = "default_block_resources")]
    pub block_resources: bool,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON output file
    #[serde(rename = "json-path")]
    pub json_path: String,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            navigation_timeout_secs: default_navigation_timeout(),
            operation_timeout_secs: default_operation_timeout(),
            block_resources: default_block_resources(),
        }
    }
}

fn default_link_selector() -> String {
    "h4 a".to_string()
}

fn default_date_selector() -> String {
    ".date".to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_delay_ms() -> u64 {
    15_000
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36"
        .to_string()
}

fn default_navigation_timeout() -> u64 {
    120
}

fn default_operation_timeout() -> u64 {
    60
}

fn default_block_resources() -> bool {
    true
}
