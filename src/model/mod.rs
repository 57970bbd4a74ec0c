//! Data model shared by the fetch, extraction and output layers
//!
//! - [`Source`]: one configured scrape target
//! - [`Record`]: the normalized result of one successful scrape
//! - [`Payload`]: the kind-specific data carried by a record

mod record;
mod source;

pub use record::{CatalogItem, Link, Payload, Quote, Record};
pub use source::{Source, SourceKind};
