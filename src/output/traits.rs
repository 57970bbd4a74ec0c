//! Exporter trait and output errors

use crate::output::store::ResultStore;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate record for source '{source_id}' at {url}")]
    DuplicateRecord { source_id: String, url: String },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A format the result store can be exported to
///
/// Exporters only read the store; exporting the same store twice yields the
/// same bytes.
pub trait Exporter {
    /// Short name of the format, used in log lines
    fn format_name(&self) -> &'static str;

    /// Encodes the whole store
    fn export(&self, store: &ResultStore) -> OutputResult<Vec<u8>>;

    /// Encodes the store and writes it to `path`, replacing any existing file
    fn write_to(&self, store: &ResultStore, path: &Path) -> OutputResult<()> {
        let bytes = self.export(store)?;

        let mut file = File::create(path)?;
        file.write_all(&bytes)?;

        tracing::info!(
            "Saved {} records as {} to {}",
            store.len(),
            self.format_name(),
            path.display()
        );
        Ok(())
    }
}
