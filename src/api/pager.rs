//! Pull-based iterator over paginated search results
//!
//! The pager hides all pagination mechanics from its consumer: the cached
//! first page, the inter-page rate floor (enforced by the client's pacer),
//! the page cap, and the stop conditions. The consumer only ever sees
//! "next record or end".

use crate::api::client::CatalogClient;
use serde_json::Value;
use std::collections::VecDeque;

/// Lazy, single-pass sequence of raw product records
///
/// Created by [`CatalogClient::search`]. Page fetches happen on demand as
/// the current page's buffer drains. Iteration ends when the catalog returns
/// an empty page, the page cap is reached, or a page fetch fails after
/// exhausting retries. In the failure case the error is logged and the
/// sequence simply ends; records already yielded remain valid.
pub struct ProductPager {
    client: CatalogClient,
    terms: String,
    max_pages: Option<u32>,
    total_count: u64,

    /// Page currently buffered (1-based)
    page: u32,
    buffer: VecDeque<Value>,
    yielded: u64,
    done: bool,
}

impl ProductPager {
    /// Creates a pager primed with the already-fetched first page
    pub(crate) fn new(
        client: CatalogClient,
        terms: String,
        max_pages: Option<u32>,
        total_count: u64,
        first_page: Vec<Value>,
    ) -> Self {
        let done = first_page.is_empty();
        Self {
            client,
            terms,
            max_pages,
            total_count,
            page: 1,
            buffer: first_page.into(),
            yielded: 0,
            done,
        }
    }

    /// Creates an already-exhausted pager with a count of 0
    ///
    /// Used when the initial count request fails: the operation degrades to
    /// "nothing to fetch" instead of an error.
    pub(crate) fn exhausted(client: CatalogClient, terms: String) -> Self {
        Self {
            client,
            terms,
            max_pages: None,
            total_count: 0,
            page: 0,
            buffer: VecDeque::new(),
            yielded: 0,
            done: true,
        }
    }

    /// The upstream-reported total number of matching products
    ///
    /// Authoritative value from the first response; 0 if it could not be
    /// determined. Advisory for progress reporting only.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Returns the next raw product record, or `None` at the end
    pub async fn next(&mut self) -> Option<Value> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                self.yielded += 1;
                return Some(record);
            }

            if self.done {
                return None;
            }

            if let Some(cap) = self.max_pages {
                if self.page >= cap {
                    tracing::warn!("Reached max page limit: {}", cap);
                    self.done = true;
                    return None;
                }
            }

            let next_page = self.page + 1;
            match self.client.fetch_page(&self.terms, next_page).await {
                Ok(page) => {
                    tracing::debug!(
                        "Page {}: retrieved {} products. Total yielded: {}/{}",
                        next_page,
                        page.products.len(),
                        self.yielded,
                        self.total_count
                    );

                    if page.products.is_empty() {
                        tracing::debug!("No more products to fetch - empty page");
                        self.done = true;
                        return None;
                    }

                    self.page = next_page;
                    self.buffer = page.products.into();
                }
                Err(e) => {
                    // In-stream page failures end the sequence; everything
                    // yielded so far stays valid.
                    tracing::error!("Error fetching page {}: {}", next_page, e);
                    self.done = true;
                    return None;
                }
            }
        }
    }
}
