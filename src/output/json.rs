//! JSON export
//!
//! The full record list, pretty-printed, with text kept verbatim (no ASCII
//! escaping of non-Latin characters).

use crate::output::store::ResultStore;
use crate::output::traits::{Exporter, OutputResult};

/// Exports every record, payload included, as a JSON array
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    fn export(&self, store: &ResultStore) -> OutputResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(store.records())?)
    }
}
