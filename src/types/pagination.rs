//! Zero-based pagination for list endpoints.

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_NUMBER, MAX_PAGE_SIZE};
use crate::domain::{Inquiry, PropertyResponse, UserWithProperties};

/// Serde adapter for query strings: `?size=` behaves like an absent value.
pub fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => FromStr::from_str(s).map_err(de::Error::custom).map(Some),
    }
}

/// `page` and `size` query parameters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Zero-based page index (default 0)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u64>,
    /// Page size (default 10, clamped to 1..=100)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub size: Option<u64>,
}

impl PaginationParams {
    pub fn resolve(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }
}

/// A resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: Option<u64>, size: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE_NUMBER).min(MAX_PAGE_NUMBER),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> u64 {
        self.size
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

/// Page envelope returned by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[aliases(
    PropertyPage = Page<PropertyResponse>,
    UserPage = Page<UserWithProperties>,
    InquiryPage = Page<Inquiry>
)]
pub struct Page<T> {
    pub total_items: u64,
    pub items: Vec<T>,
    pub total_pages: u64,
    pub current_page: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: u64, request: PageRequest) -> Self {
        let total_pages = total_items.div_ceil(request.limit());
        let current_page = request.page;
        Self {
            total_items,
            items,
            total_pages,
            current_page,
            has_next_page: current_page < total_pages.saturating_sub(1),
            has_prev_page: current_page > 0,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total_items: self.total_items,
            items: self.items.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            current_page: self.current_page,
            has_next_page: self.has_next_page,
            has_prev_page: self.has_prev_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 0, size: 10 });
        assert_eq!(PageRequest::new(Some(2), Some(0)).size, 1);
        assert_eq!(PageRequest::new(Some(2), Some(5000)).size, 100);
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 60);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        let page: Page<u8> = Page::new(vec![], 21, PageRequest::new(Some(0), Some(10)));
        assert_eq!(page.total_pages, 3);

        let page: Page<u8> = Page::new(vec![], 20, PageRequest::new(Some(0), Some(10)));
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_navigation_flags() {
        let single: Page<u8> = Page::new(vec![1, 2], 2, PageRequest::new(Some(0), Some(10)));
        assert!(!single.has_next_page);
        assert!(!single.has_prev_page);

        let middle: Page<u8> = Page::new(vec![], 30, PageRequest::new(Some(1), Some(10)));
        assert!(middle.has_next_page);
        assert!(middle.has_prev_page);

        let last: Page<u8> = Page::new(vec![], 30, PageRequest::new(Some(2), Some(10)));
        assert!(!last.has_next_page);
        assert!(last.has_prev_page);
    }

    #[test]
    fn test_huge_page_index_is_bounded() {
        let request = PaginationParams {
            page: Some(u64::MAX),
            size: Some(1),
        }
        .resolve();
        assert_eq!(request.page, MAX_PAGE_NUMBER);
        assert!(request.offset() <= i64::MAX as u64);

        let page: Page<u8> = Page::new(vec![], 5, request);
        assert!(!page.has_next_page);
        assert!(page.has_prev_page);

        let raw = PageRequest {
            page: u64::MAX,
            size: 1,
        };
        let page: Page<u8> = Page::new(vec![], 5, raw);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_empty_result() {
        let page: Page<u8> = Page::new(vec![], 0, PageRequest::default());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next_page);
        assert!(!page.has_prev_page);
    }

    #[test]
    fn test_blank_query_values_ignored() {
        let params: PaginationParams = serde_json::from_value(serde_json::json!({
            "page": "",
            "size": "25"
        }))
        .unwrap();

        assert_eq!(params.page, None);
        assert_eq!(params.resolve().size, 25);
    }

    #[test]
    fn test_envelope_field_names() {
        let page = Page::new(vec![1u8], 1, PageRequest::default());
        let json = serde_json::to_value(&page).unwrap();

        for key in ["totalItems", "items", "totalPages", "currentPage", "hasNextPage", "hasPrevPage"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}
