//! Product catalog extraction
//!
//! Layout handled (books.toscrape.com):
//!
//! ```html
//! <article class="product_pod">
//!   <p class="star-rating Three"></p>
//!   <h3><a href="..." title="Full Title">Full Ti...</a></h3>
//!   <p class="price_color">£51.77</p>
//!   <p class="instock availability">In stock</p>
//! </article>
//! ```

use super::{first_text, html_document, page_title, selector, Extraction, Extractor, Page};
use crate::model::{CatalogItem, Payload, SourceKind};
use crate::SourceError;

/// Rating vocabulary, in match order
pub const RATINGS: [&str; 5] = ["One", "Two", "Three", "Four", "Five"];

/// Value used for a missing rating or availability
pub const UNKNOWN: &str = "Unknown";

/// Extracts product entries from a catalog listing
#[derive(Debug, Default, Clone, Copy)]
pub struct CatalogExtractor;

/// Returns the first class token that names a rating
fn rating_from_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> &'static str {
    classes
        .into_iter()
        .find_map(|class| RATINGS.iter().copied().find(|rating| *rating == class))
        .unwrap_or(UNKNOWN)
}

impl Extractor for CatalogExtractor {
    fn kind(&self) -> SourceKind {
        SourceKind::Catalog
    }

    fn fallback_title(&self) -> &'static str {
        "Books to Scrape"
    }

    fn extract(&self, page: &Page) -> Result<Extraction, SourceError> {
        let document = html_document(page)?;
        let container_selector = selector("article.product_pod", page)?;
        let title_selector = selector("h3 a", page)?;
        let price_selector = selector("p.price_color", page)?;
        let rating_selector = selector("p.star-rating", page)?;
        let availability_selector = selector("p.instock.availability", page)?;

        let mut items = Vec::new();
        for container in document.select(&container_selector) {
            let title = container
                .select(&title_selector)
                .next()
                .and_then(|anchor| anchor.value().attr("title"))
                .map(|title| title.trim().to_string())
                .filter(|title| !title.is_empty());
            let price = first_text(&container, &price_selector);

            let (Some(title), Some(price)) = (title, price) else {
                tracing::debug!("Skipping catalog entry without title or price");
                continue;
            };

            let rating = container
                .select(&rating_selector)
                .next()
                .map(|element| rating_from_classes(element.value().classes()))
                .unwrap_or(UNKNOWN);

            let availability = first_text(&container, &availability_selector)
                .unwrap_or_else(|| UNKNOWN.to_string());

            items.push(CatalogItem {
                title,
                price,
                rating: rating.to_string(),
                availability,
            });
        }

        Ok(Extraction {
            title: page_title(&document, page)?,
            payload: Payload::Catalog { items },
        })
    }
}
