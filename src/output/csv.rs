//! CSV summary export
//!
//! One row per record: URL, title, kind and item count. The count always
//! comes from [`Record::item_count`](crate::model::Record::item_count), the
//! same field the JSON export writes.

use crate::output::store::ResultStore;
use crate::output::traits::{Exporter, OutputResult};

/// Header row of the summary
pub const CSV_HEADER: [&str; 4] = ["URL", "Title", "Type", "ItemsCount"];

/// Exports a one-line-per-record summary
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvSummaryExporter;

impl Exporter for CsvSummaryExporter {
    fn format_name(&self) -> &'static str {
        "CSV summary"
    }

    fn export(&self, store: &ResultStore) -> OutputResult<Vec<u8>> {
        Ok(csv_summary(store))
    }
}

/// Builds the summary; formatting into memory cannot fail
pub fn csv_summary(store: &ResultStore) -> Vec<u8> {
    let mut csv = String::new();
    push_row(&mut csv, CSV_HEADER);

    for record in store {
        let count = record.item_count().to_string();
        push_row(
            &mut csv,
            [
                record.url(),
                record.title(),
                record.kind().as_str(),
                count.as_str(),
            ],
        );
    }

    csv.into_bytes()
}

/// Appends one CRLF-terminated row
fn push_row<const N: usize>(csv: &mut String, fields: [&str; N]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            csv.push(',');
        }
        push_field(csv, field);
    }
    csv.push_str("\r\n");
}

/// Appends a field, quoting it when it contains a delimiter, quote or newline
fn push_field(csv: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        csv.push('"');
        csv.push_str(&field.replace('"', "\"\""));
        csv.push('"');
    } else {
        csv.push_str(field);
    }
}
