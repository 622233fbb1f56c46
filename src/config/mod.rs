//! Configuration module for foodfetch
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. All settings default to the catalog's documented limits, so the
//! tool runs without any configuration file at all.
//!
//! # Example
//!
//! ```no_run
//! use foodfetch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("foodfetch.toml")).unwrap();
//! println!("Endpoint: {}", config.api.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, Config, OutputConfig};

// Re-export parser functions
pub use parser::load_config;
pub use validation::validate;
