//! JSON endpoint extraction

use super::{Extraction, Extractor, Page};
use crate::harvest::fetcher::{BodyFormat, RawBody};
use crate::model::{Payload, SourceKind};
use crate::SourceError;
use serde_json::Value;

/// Maximum number of array elements kept from a JSON response
pub const MAX_API_ITEMS: usize = 10;

/// Keeps the first [`MAX_API_ITEMS`] elements of a JSON array, or wraps a
/// single non-array value as a one-element list
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonApiExtractor;

/// Copies out only the elements that are kept
fn first_items(value: &Value) -> Vec<Value> {
    match value.as_array() {
        Some(elements) => elements.iter().take(MAX_API_ITEMS).cloned().collect(),
        None => vec![value.clone()],
    }
}

impl Extractor for JsonApiExtractor {
    fn kind(&self) -> SourceKind {
        SourceKind::JsonApi
    }

    fn body_format(&self) -> BodyFormat {
        BodyFormat::Json
    }

    fn fallback_title(&self) -> &'static str {
        "JSON API Data"
    }

    fn extract(&self, page: &Page) -> Result<Extraction, SourceError> {
        let api_data = match &page.body {
            RawBody::Json(value) => first_items(value),
            RawBody::Html(text) => {
                let value: Value = serde_json::from_str(text).map_err(|e| {
                    SourceError::parse(page.url.as_str(), format!("malformed JSON: {}", e))
                })?;
                first_items(&value)
            }
        };

        // JSON endpoints have no title of their own
        Ok(Extraction {
            title: None,
            payload: Payload::Api { api_data },
        })
    }
}
