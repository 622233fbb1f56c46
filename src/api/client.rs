//! HTTP client for the catalog search endpoint
//!
//! This module handles all HTTP requests for the ingester, including:
//! - Building an HTTP client with the proper User-Agent
//! - Issuing paginated search requests
//! - Retry with exponential backoff for transient failures
//! - Parsing the search response shape

use crate::api::pacer::Pacer;
use crate::api::pager::ProductPager;
use crate::config::ApiConfig;
use crate::FoodfetchError;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// One page of search results as returned by the catalog
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    /// Upstream-reported total number of matching products
    pub count: u64,

    /// Raw product records on this page
    pub products: Vec<Value>,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The API client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ApiConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Calculates the backoff delay for a retry attempt
///
/// delay = min(base × 2^attempt, max), with attempt counted from 0.
pub fn backoff_delay(config: &ApiConfig, attempt: u32) -> Duration {
    let factor = 1u64 << attempt.min(63);
    let delay_ms = config
        .base_backoff_ms
        .saturating_mul(factor)
        .min(config.max_backoff_ms);
    Duration::from_millis(delay_ms)
}

/// Client for the catalog's paginated search API
///
/// Wraps every request in the retry policy and routes every attempt through
/// the [`Pacer`] so the inter-request floor holds even while retrying.
pub struct CatalogClient {
    client: Client,
    config: ApiConfig,
    pacer: Pacer,
}

impl CatalogClient {
    /// Creates a new catalog client from the given configuration
    pub fn new(config: ApiConfig) -> Result<Self, FoodfetchError> {
        let client = build_http_client(&config)?;
        let pacer = Pacer::new(Duration::from_millis(config.min_request_interval_ms));

        Ok(Self {
            client,
            config,
            pacer,
        })
    }

    /// Starts a paginated search and returns the record sequence
    ///
    /// The first page is fetched once to obtain the upstream total count and
    /// is reused when the sequence is driven; it is never re-fetched. If the
    /// initial fetch fails after exhausting retries, or the response shape
    /// is wrong, the error is logged and a pager with a count of 0 and an
    /// empty sequence is returned instead of failing the whole operation.
    ///
    /// # Arguments
    ///
    /// * `terms` - Search terms forwarded to the catalog
    /// * `max_pages` - Optional cap on the number of pages to fetch
    pub async fn search(mut self, terms: &str, max_pages: Option<u32>) -> ProductPager {
        tracing::info!("Starting product search for '{}'", terms);
        if let Some(cap) = max_pages {
            tracing::debug!("Page limit set to {}", cap);
        }

        match self.fetch_page(terms, 1).await {
            Ok(page) => {
                tracing::info!("Found {} total products to fetch", page.count);
                ProductPager::new(self, terms.to_string(), max_pages, page.count, page.products)
            }
            Err(e) => {
                tracing::error!("Error getting initial product count: {}", e);
                ProductPager::exhausted(self, terms.to_string())
            }
        }
    }

    /// Fetches one page of search results, retrying transient failures
    ///
    /// Transport errors and non-2xx statuses are retried with exponential
    /// backoff up to the configured ceiling; a malformed response body is
    /// not retried and fails the page immediately.
    pub(crate) async fn fetch_page(
        &mut self,
        terms: &str,
        page: u32,
    ) -> Result<SearchPage, FoodfetchError> {
        let body = self.get_with_retry(terms, page).await?;
        let parsed: SearchPage = serde_json::from_str(&body)?;
        Ok(parsed)
    }

    /// Issues the GET request for a page with the retry policy applied
    async fn get_with_retry(&mut self, terms: &str, page: u32) -> Result<String, FoodfetchError> {
        let mut attempt = 0;

        loop {
            self.pacer.wait().await;

            match self.try_get(terms, page).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.config.max_retries => {
                    let delay = backoff_delay(&self.config, attempt);
                    tracing::warn!(
                        "Request for page {} failed (attempt {}/{}): {}. Retrying in {:?}",
                        page,
                        attempt + 1,
                        self.config.max_retries + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        "Request for page {} failed after {} attempts: {}",
                        page,
                        attempt + 1,
                        e
                    );
                    return Err(FoodfetchError::Http { page, source: e });
                }
            }
        }
    }

    /// Performs a single request attempt
    async fn try_get(&self, terms: &str, page: u32) -> Result<String, reqwest::Error> {
        let query = [
            ("search_terms", terms.to_string()),
            ("json", "1".to_string()),
            ("search_simple", "1".to_string()),
            ("page", page.to_string()),
            ("page_size", self.config.page_size.to_string()),
        ];

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;

        response.text().await
    }
}
