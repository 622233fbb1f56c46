//! Batch ingestion pipeline
//!
//! Drives the record sequence through the mapper into storage under one
//! transaction. Per-record faults are logged and skipped; the batch itself
//! is all-or-nothing: a single commit at the end, full rollback on failure.

use crate::pipeline::RecordSource;
use crate::record::{barcode_of, map_product};
use crate::storage::Storage;
use crate::{FoodfetchError, Result};
use serde_json::Value;

/// How often to emit an advisory progress line
const PROGRESS_INTERVAL: u64 = 100;

/// Counters reported by an ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Records pulled from the sequence
    pub processed: u64,

    /// New products staged and committed
    pub saved: u64,
}

impl IngestReport {
    /// Records that were processed but not saved (duplicates or invalid)
    pub fn skipped(&self) -> u64 {
        self.processed - self.saved
    }
}

/// Ingests every record from the source into storage
///
/// Pulls records one at a time, skips duplicates by barcode, and stages all
/// rows of each new product. A fault in a single record is logged and does
/// not abort the batch. After the sequence is exhausted the whole batch is
/// committed at once; if the commit fails the transaction is rolled back
/// and the error is returned. Final counts are logged on both paths.
///
/// # Arguments
///
/// * `records` - The record sequence to drain
/// * `total_count` - Expected total, used only for progress reporting
/// * `storage` - The persistence backend, opened by the caller
pub async fn ingest<R, S>(records: &mut R, total_count: u64, storage: &mut S) -> Result<IngestReport>
where
    R: RecordSource,
    S: Storage,
{
    storage.begin()?;

    let mut report = IngestReport {
        processed: 0,
        saved: 0,
    };

    while let Some(record) = records.next().await {
        report.processed += 1;

        match stage_record(&record, storage) {
            Ok(true) => report.saved += 1,
            Ok(false) => {}
            Err(e) => {
                tracing::error!(
                    "Failed to process product {}: {}",
                    barcode_of(&record).unwrap_or("unknown"),
                    e
                );
            }
        }

        if report.processed % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Progress: {}/{} products processed, {} saved",
                report.processed,
                total_count,
                report.saved
            );
        }
    }

    let outcome = match storage.commit() {
        Ok(()) => {
            tracing::info!("Transaction committed successfully");
            Ok(report)
        }
        Err(commit_err) => {
            tracing::error!("Error during batch commit: {}", commit_err);
            if let Err(rollback_err) = storage.rollback() {
                tracing::error!("Rollback failed: {}", rollback_err);
            } else {
                tracing::info!("Transaction rolled back");
            }
            Err(FoodfetchError::from(commit_err))
        }
    };

    tracing::info!("Products processed: {}", report.processed);
    tracing::info!("Products saved to database: {}", report.saved);
    tracing::info!("Products skipped (duplicates or invalid): {}", report.skipped());

    outcome
}

/// Stages one record; returns whether a new product was created
fn stage_record<S: Storage>(record: &Value, storage: &mut S) -> Result<bool> {
    let Some(barcode) = barcode_of(record) else {
        tracing::warn!("Skipping product with empty barcode");
        return Ok(false);
    };

    if storage.product_exists(barcode)? {
        tracing::debug!("Product with barcode {} already exists, skipping", barcode);
        return Ok(false);
    }

    let Some(mapped) = map_product(record) else {
        return Ok(false);
    };

    storage.stage_product(&mapped)?;
    Ok(true)
}
