use crate::config::types::{BrowserConfig, Config, OutputConfig, RetryConfig, TargetConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_target_config(&config.target)?;
    validate_retry_config(&config.retry)?;
    validate_browser_config(&config.browser)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates target page configuration
fn validate_target_config(config: &TargetConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid target url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Target url must be http(s), got '{}'",
            config.url
        )));
    }

    let origin = Url::parse(&config.base_origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-origin: {}", e)))?;

    // The origin is prefixed verbatim onto path-absolute hrefs, so it must
    // carry nothing beyond scheme://host[:port]
    if origin.path() != "/" || origin.query().is_some() || origin.fragment().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-origin must not contain a path, query or fragment, got '{}'",
            config.base_origin
        )));
    }
    if config.base_origin.ends_with('/') {
        return Err(ConfigError::InvalidUrl(format!(
            "base-origin must not end with '/', got '{}'",
            config.base_origin
        )));
    }

    if config.item_selector.trim().is_empty() {
        return Err(ConfigError::Validation(
            "item-selector cannot be empty".to_string(),
        ));
    }
    if config.link_selector.trim().is_empty() {
        return Err(ConfigError::Validation(
            "link-selector cannot be empty".to_string(),
        ));
    }
    if config.date_selector.trim().is_empty() {
        return Err(ConfigError::Validation(
            "date-selector cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates retry policy configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    Ok(())
}

/// Validates browser session configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.navigation_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "navigation-timeout-secs must be >= 1, got {}",
            config.navigation_timeout_secs
        )));
    }

    if config.operation_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "operation-timeout-secs must be >= 1, got {}",
            config.operation_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.json_path.is_empty() {
        return Err(ConfigError::Validation(
            "json-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            target: TargetConfig {
                url: "https://www.ogm.gov.tr/tr/duyurular".to_string(),
                base_origin: "https://www.ogm.gov.tr".to_string(),
                item_selector: ".news-area .content-wrap .items .item".to_string(),
                link_selector: "h4 a".to_string(),
                date_selector: ".date".to_string(),
            },
            retry: RetryConfig::default(),
            browser: BrowserConfig::default(),
            output: OutputConfig {
                json_path: "./duyurular.json".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = valid_config();
        config.target.url = "ftp://example.com/announcements".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_rejects_base_origin_with_path() {
        let mut config = valid_config();
        config.target.base_origin = "https://www.ogm.gov.tr/tr".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_rejects_base_origin_with_trailing_slash() {
        let mut config = valid_config();
        config.target.base_origin = "https://www.ogm.gov.tr/".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_rejects_empty_selector() {
        let mut config = valid_config();
        config.target.item_selector = "   ".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let mut config = valid_config();
        config.retry.max_attempts = 0;
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = valid_config();
        config.browser.navigation_timeout_secs = 0;
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_rejects_empty_output_path() {
        let mut config = valid_config();
        config.output.json_path = String::new();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }
}
