//! Scraped record definitions
//!
//! A [`Record`] is built once per successful extraction and never modified
//! afterwards. Its item count is derived from the payload at construction, so
//! the count written to any export always matches the payload it describes.

use crate::model::SourceKind;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A hyperlink found on a generic document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Anchor text
    pub text: String,

    /// Absolute URL, resolved against the page URL
    pub url: String,
}

/// A single quote from a quote listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
    pub tags: Vec<String>,
}

/// A single product from a catalog page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub title: String,
    pub price: String,

    /// One of `One`..`Five`, or `Unknown`
    pub rating: String,

    /// Availability text, or `Unknown`
    pub availability: String,
}

/// Kind-specific data carried by a record
///
/// Serialized untagged so the fields sit directly inside the record object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Document {
        headings: Vec<String>,
        paragraphs: Vec<String>,
        links: Vec<Link>,
    },
    Quotes {
        quotes: Vec<Quote>,
    },
    Catalog {
        items: Vec<CatalogItem>,
    },
    Api {
        api_data: Vec<serde_json::Value>,
    },
}

impl Payload {
    /// Returns the source kind that produces this payload
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Document { .. } => SourceKind::GenericDocument,
            Self::Quotes { .. } => SourceKind::QuoteList,
            Self::Catalog { .. } => SourceKind::Catalog,
            Self::Api { .. } => SourceKind::JsonApi,
        }
    }

    /// Returns the cardinality of the kind-specific collection
    ///
    /// Generic documents count their paragraphs.
    pub fn item_count(&self) -> usize {
        match self {
            Self::Document { paragraphs, .. } => paragraphs.len(),
            Self::Quotes { quotes } => quotes.len(),
            Self::Catalog { items } => items.len(),
            Self::Api { api_data } => api_data.len(),
        }
    }
}

/// The normalized output of one source's scrape
///
/// Field order here is the key order of the JSON export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    url: String,
    title: String,
    #[serde(flatten)]
    payload: Payload,
    item_count: usize,
    timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    kind: SourceKind,
    source_id: String,
}

impl Record {
    /// Creates a record stamped with the current time
    pub fn new(
        source_id: impl Into<String>,
        url: impl Into<String>,
        title: impl Into<String>,
        payload: Payload,
    ) -> Self {
        Self::with_timestamp(source_id, url, title, payload, Utc::now())
    }

    /// Creates a record with an explicit timestamp
    pub fn with_timestamp(
        source_id: impl Into<String>,
        url: impl Into<String>,
        title: impl Into<String>,
        payload: Payload,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            item_count: payload.item_count(),
            kind: payload.kind(),
            payload,
            timestamp,
            source_id: source_id.into(),
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
