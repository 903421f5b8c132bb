use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

fn first_page() -> u32 {
    1
}

/// Pagination block attached to every list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub has_next_page: Option<bool>,
    #[serde(default)]
    pub has_prev_page: Option<bool>,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            total: 0,
            page: 1,
            limit: 0,
            total_pages: 0,
            has_next_page: None,
            has_prev_page: None,
        }
    }
}

impl Meta {
    /// Some endpoints (regions) omit `totalPages`; derive it from the total.
    pub fn pages_for(&self, limit: u32) -> u32 {
        if self.total_pages > 0 {
            return self.total_pages;
        }
        let limit = if self.limit > 0 { self.limit } else { limit };
        if limit == 0 {
            return 1;
        }
        (self.total.div_ceil(limit as u64) as u32).max(1)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Meta,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemEnvelope<T> {
    pub data: T,
}

/// One fetched page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Meta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, meta: Meta) -> Self {
        Self { items, meta }
    }
}

pub fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Page<T>, ApiError> {
    let envelope: ListEnvelope<T> = serde_json::from_value(value)?;
    Ok(Page::new(envelope.data, envelope.meta))
}

pub fn decode_item<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    let envelope: ItemEnvelope<T> = serde_json::from_value(value)?;
    Ok(envelope.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn meta_reads_camel_case() {
        let meta: Meta = serde_json::from_value(json!({
            "total": 23, "page": 3, "limit": 10, "totalPages": 3,
            "hasNextPage": false, "hasPrevPage": true
        }))
        .unwrap();
        assert_eq!(meta.total, 23);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.has_prev_page, Some(true));
    }

    #[test]
    fn missing_total_pages_is_derived() {
        let meta = Meta {
            total: 41,
            ..Meta::default()
        };
        assert_eq!(meta.pages_for(10), 5);
        assert_eq!(Meta::default().pages_for(10), 1);
    }

    #[test]
    fn list_without_meta_decodes() {
        let page: Page<String> = decode_list(json!({ "data": ["a", "b"] })).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.meta.total, 0);
    }
}
