//! Output module for storing and exporting scrape results
//!
//! This module handles:
//! - Collecting records in an ordered, duplicate-free store
//! - Exporting the store as JSON and as a CSV summary
//! - Printing a console summary of a run

mod csv;
mod json;
mod store;
pub mod summary;
mod traits;

pub use self::csv::{csv_summary, CsvSummaryExporter, CSV_HEADER};
pub use json::JsonExporter;
pub use store::ResultStore;
pub use summary::{format_summary, print_summary};
pub use traits::{Exporter, OutputError, OutputResult};
