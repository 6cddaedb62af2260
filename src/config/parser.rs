use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;
use url::Url;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use duyuru_scrape::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Target: {}", config.target.url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let mut config: Config = toml::from_str(&content)?;

    // An empty base-origin means "derive from the target URL"
    if config.target.base_origin.is_empty() {
        config.target.base_origin = derive_origin(&config.target.url)?;
    }

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Derives the `scheme://host[:port]` origin of a URL
fn derive_origin(url: &str) -> Result<String, ConfigError> {
    let parsed =
        Url::parse(url).map_err(|e| ConfigError::InvalidUrl(format!("Invalid url: {}", e)))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ConfigError::InvalidUrl(format!("url has no host: {}", url)))?;
    let origin = match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    };
    Ok(origin)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This is used to tie a scrape run's diagnostics to the exact configuration
/// it ran under.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok((Config, String))` - Successfully loaded configuration and its hash
/// * `Err(ConfigError)` - Failed to load or parse the configuration
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[target]
url = "https://www.ogm.gov.tr/tr/duyurular"
item-selector = ".news-area .content-wrap .items .item"

[retry]
max-attempts = 3
delay-ms = 500

[output]
json-path = "./duyurular.json"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.target.url, "https://www.ogm.gov.tr/tr/duyurular");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay_ms, 500);
        assert_eq!(config.output.json_path, "./duyurular.json");
        // Defaults
        assert_eq!(config.target.link_selector, "h4 a");
        assert_eq!(config.target.date_selector, ".date");
        assert!(config.browser.block_resources);
    }

    #[test]
    fn test_base_origin_derived_from_url() {
        let config_content = r#"
[target]
url = "https://www.ogm.gov.tr/tr/duyurular"
item-selector = ".item"

[output]
json-path = "./out.json"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.target.base_origin, "https://www.ogm.gov.tr");
    }

    #[test]
    fn test_explicit_base_origin_preserved() {
        let config_content = r#"
[target]
url = "https://www.ogm.gov.tr/tr/duyurular"
base-origin = "https://ogm.gov.tr"
item-selector = ".item"

[output]
json-path = "./out.json"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.target.base_origin, "https://ogm.gov.tr");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[target]
url = "https://www.ogm.gov.tr/tr/duyurular"
item-selector = ".item"

[retry]
max-attempts = 0

[output]
json-path = "./out.json"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let config_content = "test content";
        let file = create_temp_config(config_content);

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        // Same content should produce same hash
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex characters
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_derive_origin() {
        assert_eq!(
            derive_origin("https://www.ogm.gov.tr/tr/duyurular").unwrap(),
            "https://www.ogm.gov.tr"
        );
        assert_eq!(
            derive_origin("http://localhost:8080/page").unwrap(),
            "http://localhost:8080"
        );
        assert!(derive_origin("not a url").is_err());
    }
}
