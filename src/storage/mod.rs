//! Storage module
//!
//! Relational persistence for products and their dependent rows, behind a
//! trait so the pipeline can be exercised against alternative backends in
//! tests.

mod schema;
mod sqlite;
mod traits;

pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};
