//! Scrape target definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// The extraction strategy used for a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Any HTML page: headings, paragraphs and links
    GenericDocument,

    /// A page of quote containers (text, author, tags)
    QuoteList,

    /// A page of product containers (title, price, rating, availability)
    Catalog,

    /// A JSON endpoint
    JsonApi,
}

impl SourceKind {
    /// All kinds, in declaration order
    pub const ALL: [SourceKind; 4] = [
        SourceKind::GenericDocument,
        SourceKind::QuoteList,
        SourceKind::Catalog,
        SourceKind::JsonApi,
    ];

    /// Returns the string used in configuration files and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenericDocument => "generic_document",
            Self::QuoteList => "quote_list",
            Self::Catalog => "catalog",
            Self::JsonApi => "json_api",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured scrape target
///
/// Sources are immutable once built; the URL is the default endpoint and can
/// be overridden per call through [`crate::Orchestrator::run_one_at`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Source {
    id: String,
    url: String,
    kind: SourceKind,
}

impl Source {
    pub fn new(id: impl Into<String>, url: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            kind,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }
}
