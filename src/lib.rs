//! Duyuru-Scrape: announcement scraper for a dynamically-rendered page
//!
//! This crate drives a headless Chromium session through navigation,
//! readiness-waiting and in-page DOM extraction, retries transient failures
//! with a fixed delay, and writes the extracted announcement records as a
//! full-replacement JSON file.

pub mod config;
pub mod extract;
pub mod output;
pub mod scrape;

use thiserror::Error;

/// Main error type for Duyuru-Scrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("Failed to launch browser: {0}")]
    BrowserLaunch(String),

    #[error("Navigation failed for {url} (status: {status:?})")]
    NavigationFailed { url: String, status: Option<i64> },

    #[error("Navigation timed out for {url}")]
    NavigationTimeout { url: String },

    #[error("Timed out waiting for selector '{selector}'")]
    ReadinessTimeout { selector: String },

    #[error("All {attempts} attempts failed: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: Box<ScrapeError>,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Duyuru-Scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::AnnouncementRecord;
pub use scrape::{run, ScrapeOutcome};
