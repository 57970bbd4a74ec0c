//! Console summary of a run

use crate::model::{Record, SourceKind};
use crate::output::store::ResultStore;

/// Label describing what a record's count measures
fn count_label(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::GenericDocument => "Paragraphs found",
        SourceKind::QuoteList => "Quotes found",
        SourceKind::Catalog => "Books found",
        SourceKind::JsonApi => "API items",
    }
}

/// Formats one block per record
pub fn format_summary(store: &ResultStore) -> String {
    let mut out = String::new();

    out.push_str(&"=".repeat(50));
    out.push_str("\nSCRAPING SUMMARY\n");
    out.push_str(&"=".repeat(50));
    out.push('\n');

    for record in store {
        out.push_str(&format_record(record));
        out.push_str(&"-".repeat(30));
        out.push('\n');
    }

    out.push_str(&format!("Collected data from {} sites\n", store.len()));
    out
}

fn format_record(record: &Record) -> String {
    format!(
        "Site: {}\nURL: {}\nType: {}\n{}: {}\n",
        record.title(),
        record.url(),
        record.kind(),
        count_label(record.kind()),
        record.item_count()
    )
}

/// Prints the summary to stdout
pub fn print_summary(store: &ResultStore) {
    println!("\n{}", format_summary(store));
}
