//! Output module
//!
//! Read-only reporting over an existing product database.

mod stats;

pub use stats::{load_statistics, print_statistics, IngestStatistics};
