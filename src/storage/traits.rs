//! Storage trait and error types
//!
//! This module defines the trait interface for the persistence backend and
//! its associated error type.

use crate::record::MappedProduct;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for the persistence backend
///
/// The ingestion pipeline uses exactly one logical transaction per run:
/// `begin` at the start, `stage_product` for every new record, and a single
/// `commit` (or `rollback`) at the end. Staged rows are visible to
/// `product_exists` within the open transaction, so in-run duplicates are
/// caught the same way as previously persisted ones.
pub trait Storage {
    /// Opens the batch transaction
    fn begin(&mut self) -> StorageResult<()>;

    /// Commits all staged writes
    fn commit(&mut self) -> StorageResult<()>;

    /// Discards all staged writes
    fn rollback(&mut self) -> StorageResult<()>;

    /// Checks whether a product with this barcode already exists
    fn product_exists(&self, barcode: &str) -> StorageResult<bool>;

    /// Stages a mapped product and all of its dependent rows
    ///
    /// # Returns
    ///
    /// The surrogate ID assigned to the new product row
    fn stage_product(&mut self, mapped: &MappedProduct) -> StorageResult<i64>;

    // ===== Statistics =====

    /// Counts persisted products
    fn count_products(&self) -> StorageResult<u64>;

    /// Counts persisted nutrition rows
    fn count_nutrition_rows(&self) -> StorageResult<u64>;

    /// Counts persisted ingredient rows
    fn count_ingredient_rows(&self) -> StorageResult<u64>;

    /// Counts persisted category rows
    fn count_category_rows(&self) -> StorageResult<u64>;

    /// Counts persisted country rows
    fn count_country_rows(&self) -> StorageResult<u64>;
}
