//! In-memory result store
//!
//! Records are kept in insertion order. The store takes `&mut self` to
//! append, so there is a single writer at any time; parallel runs collect
//! their results first and append afterwards.

use crate::model::Record;
use crate::output::csv::{csv_summary, CsvSummaryExporter};
use crate::output::json::JsonExporter;
use crate::output::traits::{Exporter, OutputError, OutputResult};
use std::collections::HashSet;
use std::path::Path;

/// Ordered collection of the records produced by one run
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    records: Vec<Record>,
    keys: HashSet<(String, String)>,
}

impl ResultStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The record was stored
    /// * `Err(OutputError::DuplicateRecord)` - A record with the same source id
    ///   and URL is already present
    pub fn append(&mut self, record: Record) -> OutputResult<()> {
        let key = (record.source_id().to_string(), record.url().to_string());
        if self.keys.contains(&key) {
            return Err(OutputError::DuplicateRecord {
                source_id: key.0,
                url: key.1,
            });
        }

        self.keys.insert(key);
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Returns the first record produced by a source
    pub fn get(&self, source_id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.source_id() == source_id)
    }

    /// Encodes the store with any exporter
    pub fn export(&self, exporter: &dyn Exporter) -> OutputResult<Vec<u8>> {
        exporter.export(self)
    }

    /// Pretty-printed JSON array of every record
    pub fn to_json(&self) -> OutputResult<Vec<u8>> {
        JsonExporter.export(self)
    }

    /// CSV summary with header `URL,Title,Type,ItemsCount`
    pub fn to_csv_summary(&self) -> Vec<u8> {
        csv_summary(self)
    }

    /// Writes the JSON export to `path`
    pub fn write_json(&self, path: &Path) -> OutputResult<()> {
        JsonExporter.write_to(self, path)
    }

    /// Writes the CSV summary to `path`
    pub fn write_csv_summary(&self, path: &Path) -> OutputResult<()> {
        CsvSummaryExporter.write_to(self, path)
    }
}

impl<'a> IntoIterator for &'a ResultStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
