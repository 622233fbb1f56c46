//! Catalog API client module
//!
//! This module contains the paginating retrieval client, including:
//! - HTTP requests with retry and exponential backoff
//! - Rate-limit compliance between successive requests
//! - A pull-based pager over the result pages

mod client;
mod pacer;
mod pager;

pub use client::{backoff_delay, build_http_client, CatalogClient, SearchPage};
pub use pacer::Pacer;
pub use pager::ProductPager;
