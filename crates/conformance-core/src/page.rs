//! Version-polymorphic paged-response shape.
//!
//! HSDS-UK 3.0 services return snake_case pagination metadata
//! (`total_items`, `first_page`, `contents`, ...) while 1.0 services
//! return the Spring-style shape (`totalElements`, `first`,
//! `content`, ...). Both map onto the one logical [`Page`] shape; the
//! decoder is selected once per validation run from the standard
//! version.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::version::StandardVersion;

/// One page of a paged collection response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Total item count across all pages.
    pub total_items: i64,
    /// Total page count.
    pub total_pages: i64,
    /// 1-based number of this page.
    pub page_number: i64,
    /// Declared number of items on this page.
    pub size: i64,
    /// Declared first-page flag.
    pub first_page: bool,
    /// Declared last-page flag.
    pub last_page: bool,
    /// Declared empty flag.
    pub empty: bool,
    /// The items themselves, kept as raw JSON.
    pub contents: Vec<Value>,
}

/// HSDS-UK 3.0 wire shape.
#[derive(Debug, Deserialize)]
struct PageV3Wire {
    #[serde(default)]
    total_items: i64,
    #[serde(default)]
    total_pages: i64,
    #[serde(default)]
    page_number: i64,
    #[serde(default)]
    size: i64,
    #[serde(default)]
    first_page: bool,
    #[serde(default)]
    last_page: bool,
    #[serde(default)]
    empty: bool,
    #[serde(default)]
    contents: Vec<Value>,
}

/// HSDS-UK 1.0 (Spring-style) wire shape. No `empty` flag on the
/// wire; it is derived from the returned content.
#[derive(Debug, Deserialize)]
struct PageV1Wire {
    #[serde(rename = "totalElements", default)]
    total_items: i64,
    #[serde(rename = "totalPages", default)]
    total_pages: i64,
    #[serde(rename = "number", default)]
    page_number: i64,
    #[serde(default)]
    size: i64,
    #[serde(rename = "first", default)]
    first_page: bool,
    #[serde(rename = "last", default)]
    last_page: bool,
    empty: Option<bool>,
    #[serde(rename = "content", default)]
    contents: Vec<Value>,
}

impl Page {
    /// Decode a raw response document into the logical page shape for
    /// the given standard version.
    pub fn decode(version: StandardVersion, document: &Value) -> Result<Self> {
        match version {
            StandardVersion::V1 => {
                let wire: PageV1Wire = serde_json::from_value(document.clone())
                    .map_err(|e| Error::invalid_page(e.to_string()))?;
                let empty = wire.empty.unwrap_or(wire.contents.is_empty());
                Ok(Self {
                    total_items: wire.total_items,
                    total_pages: wire.total_pages,
                    page_number: wire.page_number,
                    size: wire.size,
                    first_page: wire.first_page,
                    last_page: wire.last_page,
                    empty,
                    contents: wire.contents,
                })
            }
            StandardVersion::V2 | StandardVersion::V3 => {
                let wire: PageV3Wire = serde_json::from_value(document.clone())
                    .map_err(|e| Error::invalid_page(e.to_string()))?;
                Ok(Self {
                    total_items: wire.total_items,
                    total_pages: wire.total_pages,
                    page_number: wire.page_number,
                    size: wire.size,
                    first_page: wire.first_page,
                    last_page: wire.last_page,
                    empty: wire.empty,
                    contents: wire.contents,
                })
            }
        }
    }

    /// Number of items actually returned on this page.
    pub fn item_count(&self) -> usize {
        self.contents.len()
    }

    /// Extract the `id` of one returned item, tolerating both string
    /// and numeric identifiers.
    pub fn item_id(item: &Value) -> Option<String> {
        match item.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
