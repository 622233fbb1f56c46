use serde::Deserialize;

/// Main configuration structure for foodfetch
///
/// Every field has a default carrying the catalog's documented limits, so a
/// config file is only needed to override individual values.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Catalog API client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Search endpoint URL
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Number of records requested per page
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,

    /// Minimum time between successive requests (milliseconds)
    ///
    /// The catalog allows 100 search requests per minute, so the default
    /// floor is one request every 600 ms.
    #[serde(rename = "min-request-interval-ms", default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Maximum retries after a failed request (4 attempts total by default)
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay for exponential backoff (milliseconds)
    #[serde(rename = "base-backoff-ms", default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,

    /// Ceiling for exponential backoff (milliseconds)
    #[serde(rename = "max-backoff-ms", default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            min_request_interval_ms: default_min_request_interval_ms(),
            max_retries: default_max_retries(),
            base_backoff_ms: default_base_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            user_agent: default_user_agent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_base_url() -> String {
    "https://world.openfoodfacts.org/cgi/search.pl".to_string()
}

fn default_page_size() -> u32 {
    250
}

fn default_min_request_interval_ms() -> u64 {
    600
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_backoff_ms() -> u64 {
    1_000
}

fn default_max_backoff_ms() -> u64 {
    60_000
}

fn default_user_agent() -> String {
    "foodfetch/1.0 (+https://github.com/foodfetch/foodfetch)".to_string()
}

fn default_database_path() -> String {
    "food_products.db".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_catalog_limits() {
        let config = Config::default();

        assert_eq!(
            config.api.base_url,
            "https://world.openfoodfacts.org/cgi/search.pl"
        );
        assert_eq!(config.api.page_size, 250);
        assert_eq!(config.api.min_request_interval_ms, 600);
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.api.base_backoff_ms, 1_000);
        assert_eq!(config.api.max_backoff_ms, 60_000);
        assert_eq!(config.output.database_path, "food_products.db");
    }
}
