use crate::config::Config;
use crate::ConfigError;
use url::Url;

/// Validates a loaded configuration
///
/// Checks that the endpoint URL is a well-formed http(s) URL, that the page
/// size is within the catalog's accepted range, and that the backoff window
/// is internally consistent.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let parsed = Url::parse(&config.api.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.api.base_url, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Only HTTP and HTTPS endpoints are supported, got: {}",
            parsed.scheme()
        )));
    }

    if config.api.page_size == 0 || config.api.page_size > 1_000 {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and 1000, got {}",
            config.api.page_size
        )));
    }

    if config.api.max_backoff_ms < config.api.base_backoff_ms {
        return Err(ConfigError::Validation(format!(
            "max-backoff-ms ({}) must not be smaller than base-backoff-ms ({})",
            config.api.max_backoff_ms, config.api.base_backoff_ms
        )));
    }

    if config.output.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database-path must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let mut config = Config::default();
        config.api.base_url = "ftp://world.openfoodfacts.org/search".to_string();

        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_malformed_endpoint() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();

        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let mut config = Config::default();
        config.api.page_size = 0;

        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_rejects_oversized_page() {
        let mut config = Config::default();
        config.api.page_size = 5_000;

        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_inverted_backoff_window() {
        let mut config = Config::default();
        config.api.base_backoff_ms = 10_000;
        config.api.max_backoff_ms = 1_000;

        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_rejects_empty_database_path() {
        let mut config = Config::default();
        config.output.database_path = "  ".to_string();

        assert!(validate(&config).is_err());
    }
}
