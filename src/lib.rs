//! Foodfetch: a paginated OpenFoodFacts ingester
//!
//! This crate fetches product records from the OpenFoodFacts search API,
//! page by page with retry/backoff and rate-limit compliance, and stores
//! them with their nutrition, ingredient, category, and country sub-records
//! in a local SQLite database, skipping duplicates by barcode.

pub mod api;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod storage;

use thiserror::Error;

/// Main error type for foodfetch operations
#[derive(Debug, Error)]
pub enum FoodfetchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for page {page}: {source}")]
    Http { page: u32, source: reqwest::Error },

    #[error("Malformed search response: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

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

/// Result type alias for foodfetch operations
pub type Result<T> = std::result::Result<T, FoodfetchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use api::{CatalogClient, ProductPager};
pub use config::Config;
pub use pipeline::{ingest, IngestReport, RecordSource};
pub use record::{map_product, normalize, title_case, MappedProduct};
pub use storage::{SqliteStorage, Storage};
