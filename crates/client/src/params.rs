//! Client-side search parameters

use questsearch_core::{params::DEFAULT_LIMIT, SortField, SortOrder};
use serde::{Deserialize, Serialize};

/// Parameters of one search as issued by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub page: u32,
    pub limit: u32,
    pub types: Vec<String>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            limit: DEFAULT_LIMIT,
            types: Vec::new(),
            sort_field: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

impl SearchParams {
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_types(mut self, types: Vec<String>) -> Self {
        self.types = types;
        self
    }

    pub fn with_sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_field = field;
        self.sort_order = order;
        self
    }

    /// A blank query on the first page needs no network round-trip
    pub fn is_blank_first_page(&self) -> bool {
        self.query.trim().is_empty() && self.page == 1
    }

    /// Query-string pairs for `GET /api/search`
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("query", self.query.clone()),
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("sort", self.sort_field.as_str().to_string()),
            ("order", self.sort_order.as_str().to_string()),
        ];
        if !self.types.is_empty() {
            pairs.push(("types", self.types.join(",")));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = SearchParams::default();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert_eq!(params.sort_field, SortField::CreatedAt);
        assert_eq!(params.sort_order, SortOrder::Desc);
        assert!(params.is_blank_first_page());
    }

    #[test]
    fn test_blank_query_on_later_page_is_not_short_circuited() {
        assert!(!SearchParams::new("  ").with_page(2).is_blank_first_page());
        assert!(!SearchParams::new("cat").is_blank_first_page());
    }

    #[test]
    fn test_query_pairs() {
        let params = SearchParams::new("cat")
            .with_page(2)
            .with_types(vec!["MCQ".to_string(), "ANAGRAM".to_string()])
            .with_sort(SortField::Title, SortOrder::Asc);
        let pairs = params.to_query_pairs();
        assert!(pairs.contains(&("query", "cat".to_string())));
        assert!(pairs.contains(&("page", "2".to_string())));
        assert!(pairs.contains(&("sort", "title".to_string())));
        assert!(pairs.contains(&("order", "asc".to_string())));
        assert!(pairs.contains(&("types", "MCQ,ANAGRAM".to_string())));

        let pairs = SearchParams::new("cat").to_query_pairs();
        assert!(pairs.iter().all(|(k, _)| *k != "types"));
    }
}
