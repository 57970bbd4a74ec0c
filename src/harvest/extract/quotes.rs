//! Quote listing extraction
//!
//! Layout handled (quotes.toscrape.com):
//!
//! ```html
//! <div class="quote">
//!   <span class="text">“...”</span>
//!   <small class="author">...</small>
//!   <a class="tag">...</a> <a class="tag">...</a>
//! </div>
//! ```

use super::{
    element_text, first_text, html_document, page_title, selector, Extraction, Extractor, Page,
};
use crate::model::{Payload, Quote, SourceKind};
use crate::SourceError;

/// Extracts quotes with their author and tags
#[derive(Debug, Default, Clone, Copy)]
pub struct QuoteListExtractor;

/// A quote container as found on the page, before filtering
#[derive(Debug)]
struct QuoteCandidate {
    text: Option<String>,
    author: Option<String>,
    tags: Vec<String>,
}

impl QuoteCandidate {
    /// Keeps only containers that have both text and an author
    fn into_quote(self) -> Option<Quote> {
        match (self.text, self.author) {
            (Some(text), Some(author)) => Some(Quote {
                text,
                author,
                tags: self.tags,
            }),
            (text, author) => {
                tracing::debug!(
                    "Skipping quote container (text: {}, author: {})",
                    text.is_some(),
                    author.is_some()
                );
                None
            }
        }
    }
}

impl Extractor for QuoteListExtractor {
    fn kind(&self) -> SourceKind {
        SourceKind::QuoteList
    }

    fn fallback_title(&self) -> &'static str {
        "Quotes to Scrape"
    }

    fn extract(&self, page: &Page) -> Result<Extraction, SourceError> {
        let document = html_document(page)?;
        let container_selector = selector("div.quote", page)?;
        let text_selector = selector("span.text", page)?;
        let author_selector = selector("small.author", page)?;
        let tag_selector = selector("a.tag", page)?;

        let candidates: Vec<QuoteCandidate> = document
            .select(&container_selector)
            .map(|container| QuoteCandidate {
                text: first_text(&container, &text_selector),
                author: first_text(&container, &author_selector),
                tags: container
                    .select(&tag_selector)
                    .map(|tag| element_text(&tag))
                    .collect(),
            })
            .collect();

        let quotes = candidates
            .into_iter()
            .filter_map(QuoteCandidate::into_quote)
            .collect();

        Ok(Extraction {
            title: page_title(&document, page)?,
            payload: Payload::Quotes { quotes },
        })
    }
}
