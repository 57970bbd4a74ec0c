//! Site-Harvest: a small multi-site scraper
//!
//! This crate fetches a fixed set of configured sources, extracts a structured
//! record from each one with a source-specific strategy, and aggregates the
//! results into an ordered store that can be exported as JSON or as a CSV
//! summary. One failing source never aborts the rest of the batch.

pub mod config;
pub mod harvest;
pub mod model;
pub mod output;

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Main error type for Site-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors raised while scraping a single source
///
/// All of these are recoverable: a batch run logs them and moves on to the
/// next source, a single-source run hands them back to the caller.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Connection failed for {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Request timeout for {url} after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Parse error for {url}: {message}")]
    Parse { url: String, message: String },
}

impl SourceError {
    /// Returns the category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection { .. } => ErrorKind::Connection,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::HttpStatus { .. } => ErrorKind::HttpStatus,
            Self::Parse { .. } => ErrorKind::Parse,
        }
    }

    /// Returns the URL the error occurred on
    pub fn url(&self) -> &str {
        match self {
            Self::Connection { url, .. }
            | Self::Timeout { url, .. }
            | Self::HttpStatus { url, .. }
            | Self::Parse { url, .. } => url,
        }
    }

    /// Returns true if another attempt could plausibly succeed
    ///
    /// Connection failures, timeouts, 429 and 5xx responses are transient.
    /// Client errors and malformed documents are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Connection { .. } | Self::Timeout { .. } => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Self::Parse { .. } => false,
        }
    }

    pub(crate) fn parse(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Category of a [`SourceError`], used for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Connection,
    Timeout,
    HttpStatus,
    Parse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connection => "ConnectionError",
            Self::Timeout => "TimeoutError",
            Self::HttpStatus => "HttpStatusError",
            Self::Parse => "ParseError",
        };
        f.write_str(name)
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Site-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{ExecutionMode, Orchestrator};
pub use model::{Record, Source, SourceKind};
pub use output::ResultStore;
