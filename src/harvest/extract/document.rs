//! Generic document extraction: headings, paragraphs and links

use super::{element_text, html_document, page_title, selector, Extraction, Extractor, Page};
use crate::model::{Link, Payload, SourceKind};
use crate::SourceError;

/// Maximum number of links kept per document
pub const MAX_LINKS: usize = 10;

/// Extracts the outline of an arbitrary HTML page
///
/// - `h1`..`h3` text in document order
/// - non-empty `p` text in document order
/// - the first [`MAX_LINKS`] `a[href]` links, resolved against the page URL
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentExtractor;

impl Extractor for DocumentExtractor {
    fn kind(&self) -> SourceKind {
        SourceKind::GenericDocument
    }

    fn fallback_title(&self) -> &'static str {
        "No title found"
    }

    fn extract(&self, page: &Page) -> Result<Extraction, SourceError> {
        let document = html_document(page)?;
        let heading_selector = selector("h1, h2, h3", page)?;
        let paragraph_selector = selector("p", page)?;
        let link_selector = selector("a[href]", page)?;

        let headings = document
            .select(&heading_selector)
            .map(|element| element_text(&element))
            .collect();

        let paragraphs = document
            .select(&paragraph_selector)
            .map(|element| element_text(&element))
            .filter(|text| !text.is_empty())
            .collect();

        let links = document
            .select(&link_selector)
            .filter_map(|element| {
                let href = element.value().attr("href")?;
                match page.url.join(href.trim()) {
                    Ok(resolved) => Some(Link {
                        text: element_text(&element),
                        url: resolved.to_string(),
                    }),
                    Err(e) => {
                        tracing::debug!("Skipping unresolvable link '{}': {}", href, e);
                        None
                    }
                }
            })
            .take(MAX_LINKS)
            .collect();

        Ok(Extraction {
            title: page_title(&document, page)?,
            payload: Payload::Document {
                headings,
                paragraphs,
                links,
            },
        })
    }
}
