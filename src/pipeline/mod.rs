//! Ingestion pipeline module
//!
//! Orchestrates the retrieval client's record sequence through the record
//! mapper and into storage under a single batch transaction.

mod ingest;

pub use ingest::{ingest, IngestReport};

use crate::api::ProductPager;
use serde_json::Value;

/// A pull-based source of raw product records
///
/// The pipeline is written against this seam so tests can feed it records
/// without a network.
pub trait RecordSource {
    /// Returns the next raw record, or `None` when the sequence ends
    async fn next(&mut self) -> Option<Value>;
}

impl RecordSource for ProductPager {
    async fn next(&mut self) -> Option<Value> {
        ProductPager::next(self).await
    }
}
