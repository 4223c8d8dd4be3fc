//! Search API request and error types
//!
//! Query parameters arrive as raw strings and are handed to the search
//! service untouched apart from defaults; all clamping happens there.

use questsearch_core::{QuestError, SearchRequest};
use thiserror::Error;

/// Default `page` parameter
pub const DEFAULT_PAGE_PARAM: &str = "1";

/// Default `limit` parameter
pub const DEFAULT_LIMIT_PARAM: &str = "10";

/// Default `sort` parameter
pub const DEFAULT_SORT_PARAM: &str = "createdAt";

/// Default `order` parameter
pub const DEFAULT_ORDER_PARAM: &str = "asc";

/// Message of a successful search response
pub const SEARCH_SUCCESS_MESSAGE: &str = "Search results fetched successfully";

/// Message of a failed search caused by the server
pub const SEARCH_FAILURE_MESSAGE: &str = "Failed to fetch search results";

/// Raw query parameters of `GET /api/search`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQueryParams {
    pub query: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub types: Vec<String>,
}

impl SearchQueryParams {
    /// Collect parameters from decoded query-string pairs
    ///
    /// `types` may repeat (`types=MCQ&types=ANAGRAM`) and each value may be
    /// comma-joined. For the other keys the last occurrence wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "query" => params.query = Some(value),
                "page" => params.page = Some(value),
                "limit" => params.limit = Some(value),
                "sort" => params.sort = Some(value),
                "order" => params.order = Some(value),
                "types" | "types[]" => params.types.push(value),
                _ => {}
            }
        }
        params
    }

    /// Convert into a service request, filling HTTP defaults
    pub fn into_request(self) -> SearchRequest {
        SearchRequest {
            query: self.query,
            page: Some(self.page.unwrap_or_else(|| DEFAULT_PAGE_PARAM.to_string())),
            limit: Some(self.limit.unwrap_or_else(|| DEFAULT_LIMIT_PARAM.to_string())),
            sort: Some(self.sort.unwrap_or_else(|| DEFAULT_SORT_PARAM.to_string())),
            order: Some(self.order.unwrap_or_else(|| DEFAULT_ORDER_PARAM.to_string())),
            types: self.types,
        }
    }
}

/// A failed search as seen by the HTTP layer
#[derive(Error, Debug)]
#[error("{source}")]
pub struct SearchApiError {
    #[source]
    pub source: QuestError,
    /// Include internal error details in 500 responses
    pub expose_details: bool,
}

impl SearchApiError {
    pub fn new(source: QuestError, expose_details: bool) -> Self {
        Self {
            source,
            expose_details,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.source.is_client_error()
    }
}
