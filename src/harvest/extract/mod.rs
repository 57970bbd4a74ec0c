//! Per-source extraction strategies
//!
//! Each [`SourceKind`] is handled by one [`Extractor`]. The orchestrator looks
//! extractors up in an [`ExtractorRegistry`] by kind and never inspects the
//! document itself, so adding a kind means adding an extractor and registering
//! it, without touching the orchestrator or the other strategies.

mod catalog;
mod document;
mod json_api;
mod quotes;

pub use catalog::{CatalogExtractor, RATINGS, UNKNOWN};
pub use document::{DocumentExtractor, MAX_LINKS};
pub use json_api::{JsonApiExtractor, MAX_API_ITEMS};
pub use quotes::QuoteListExtractor;

use crate::harvest::fetcher::{BodyFormat, RawBody};
use crate::model::{Payload, SourceKind};
use crate::SourceError;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use url::Url;

/// A fetched document handed to an extractor
#[derive(Debug, Clone)]
pub struct Page {
    /// The page URL, used to resolve relative links
    pub url: Url,

    pub body: RawBody,
}

impl Page {
    pub fn new(url: Url, body: RawBody) -> Self {
        Self { url, body }
    }

    /// Convenience constructor for markup
    pub fn html(url: Url, html: impl Into<String>) -> Self {
        Self::new(url, RawBody::Html(html.into()))
    }
}

/// What an extractor pulled out of a page
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// The document title, if one was found
    pub title: Option<String>,

    pub payload: Payload,
}

/// Strategy turning a fetched page into a payload
pub trait Extractor: Send + Sync {
    /// The source kind this extractor handles
    fn kind(&self) -> SourceKind;

    /// How the fetcher should read the response body
    fn body_format(&self) -> BodyFormat {
        BodyFormat::Html
    }

    /// Title used when the page has none
    fn fallback_title(&self) -> &'static str;

    /// Extracts the payload
    ///
    /// # Returns
    ///
    /// * `Ok(Extraction)` - The page had the expected shape
    /// * `Err(SourceError::Parse)` - The page could not be interpreted
    fn extract(&self, page: &Page) -> Result<Extraction, SourceError>;
}

/// Extractors keyed by the kind they handle
pub struct ExtractorRegistry {
    extractors: HashMap<SourceKind, Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// Creates a registry with no extractors
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registers an extractor under its own kind
    ///
    /// Returns the extractor previously registered for that kind, if any.
    pub fn register(&mut self, extractor: Box<dyn Extractor>) -> Option<Box<dyn Extractor>> {
        self.extractors.insert(extractor.kind(), extractor)
    }

    /// Looks up the extractor for a kind
    pub fn get(&self, kind: SourceKind) -> Option<&dyn Extractor> {
        self.extractors.get(&kind).map(|extractor| extractor.as_ref())
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl Default for ExtractorRegistry {
    /// A registry holding the built-in extractor for every kind
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(DocumentExtractor));
        registry.register(Box::new(QuoteListExtractor));
        registry.register(Box::new(CatalogExtractor));
        registry.register(Box::new(JsonApiExtractor));
        registry
    }
}

/// Parses a CSS selector, reporting failure against the page URL
pub(crate) fn selector(css: &str, page: &Page) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| {
        SourceError::parse(page.url.as_str(), format!("bad selector '{}': {}", css, e))
    })
}

/// Parses the page body as an HTML document
pub(crate) fn html_document(page: &Page) -> Result<Html, SourceError> {
    match &page.body {
        RawBody::Html(markup) => Ok(Html::parse_document(markup)),
        RawBody::Json(_) => Err(SourceError::parse(
            page.url.as_str(),
            "expected an HTML document, got JSON",
        )),
    }
}

/// Extracts the page title from the `<title>` element
pub(crate) fn page_title(document: &Html, page: &Page) -> Result<Option<String>, SourceError> {
    let title_selector = selector("title", page)?;

    Ok(document
        .select(&title_selector)
        .next()
        .map(|element| element_text(&element))
        .filter(|s| !s.is_empty()))
}

/// Collects and trims the text content of an element
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the first descendant matching `selector`, if any
pub(crate) fn first_text(container: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    container
        .select(selector)
        .next()
        .map(|element| element_text(&element))
}
