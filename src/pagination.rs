// ABOUTME: Page-number pagination for list endpoints
// ABOUTME: Parses page/limit, computes offsets and builds the {count, next, previous, results} envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use http::Uri;
use serde::Serialize;
use url::form_urlencoded;

use crate::config::PaginationConfig;
use crate::constants::error_messages;
use crate::errors::{AppError, AppResult, ErrorCode};

fn invalid_page() -> AppError {
    AppError::new(ErrorCode::ResourceNotFound, error_messages::INVALID_PAGE)
}

/// Requested page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
}

impl PageParams {
    /// Parse raw `page` and `limit` values
    ///
    /// A missing, zero or non-numeric `limit` falls back to the default page
    /// size; larger values are capped.
    ///
    /// # Errors
    ///
    /// Returns not-found for a page number that is not a positive integer
    pub fn from_raw(
        page: Option<&str>,
        limit: Option<&str>,
        config: &PaginationConfig,
    ) -> AppResult<Self> {
        let page = match page.map(str::trim) {
            None | Some("") => 1,
            Some(raw) => match raw.parse::<u32>() {
                Ok(value) if value >= 1 => value,
                _ => return Err(invalid_page()),
            },
        };

        let limit = limit
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|value| *value > 0)
            .map_or(config.default_page_size, |value| {
                value.min(config.max_page_size)
            });

        Ok(Self { page, limit })
    }

    /// Rows to skip
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    /// Page size as a SQL bind value
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Total matching rows
    pub count: i64,
    /// Link to the next page
    pub next: Option<String>,
    /// Link to the previous page
    pub previous: Option<String>,
    /// Rows on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble a page, rejecting a page number past the end
    ///
    /// # Errors
    ///
    /// Returns not-found when `page > 1` and the page holds no rows
    pub fn new(results: Vec<T>, count: i64, params: PageParams, uri: &Uri) -> AppResult<Self> {
        if params.page > 1 && params.offset() >= count {
            return Err(invalid_page());
        }

        let has_next = params.offset() + params.limit() < count;
        let next = has_next.then(|| page_link(uri, Some(params.page + 1)));
        let previous = match params.page {
            1 => None,
            2 => Some(page_link(uri, None)),
            page => Some(page_link(uri, Some(page - 1))),
        };

        Ok(Self {
            count,
            next,
            previous,
            results,
        })
    }

    /// Convert the rows while keeping the envelope
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Request-relative link with `page` replaced; other parameters are kept
fn page_link(uri: &Uri, page: Option<u32>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    if let Some(query) = uri.query() {
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key != "page" {
                serializer.append_pair(&key, &value);
            }
        }
    }
    if let Some(page) = page {
        serializer.append_pair("page", &page.to_string());
    }

    let query = serializer.finish();
    if query.is_empty() {
        uri.path().to_owned()
    } else {
        format!("{}?{query}", uri.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaginationConfig {
        PaginationConfig {
            default_page_size: 6,
            max_page_size: 100,
        }
    }

    #[test]
    fn test_params_defaults_and_caps() {
        let params = PageParams::from_raw(None, None, &config()).unwrap();
        assert_eq!(params, PageParams { page: 1, limit: 6 });

        let params = PageParams::from_raw(Some("3"), Some("500"), &config()).unwrap();
        assert_eq!(params.limit, 100);
        assert_eq!(params.offset(), 200);

        let params = PageParams::from_raw(None, Some("abc"), &config()).unwrap();
        assert_eq!(params.limit, 6);

        assert_eq!(
            PageParams::from_raw(Some("0"), None, &config())
                .unwrap_err()
                .http_status(),
            404
        );
    }

    #[test]
    fn test_links_preserve_other_params() {
        let uri: Uri = "/api/recipes/?tags=lunch&page=2&limit=2".parse().unwrap();
        let params = PageParams { page: 2, limit: 2 };
        let page = Page::new(vec![1, 2], 7, params, &uri).unwrap();

        assert_eq!(
            page.next.as_deref(),
            Some("/api/recipes/?tags=lunch&limit=2&page=3")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/recipes/?tags=lunch&limit=2")
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let uri: Uri = "/api/users/".parse().unwrap();
        let page = Page::new(vec![1], 1, PageParams { page: 1, limit: 6 }, &uri).unwrap();
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
    }

    #[test]
    fn test_page_past_end_is_not_found() {
        let uri: Uri = "/api/recipes/".parse().unwrap();
        let result = Page::<i32>::new(vec![], 3, PageParams { page: 2, limit: 6 }, &uri);
        assert_eq!(result.unwrap_err().http_status(), 404);

        let empty_first = Page::<i32>::new(vec![], 0, PageParams { page: 1, limit: 6 }, &uri);
        assert!(empty_first.is_ok());
    }
}
