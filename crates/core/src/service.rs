//! Search orchestration
//!
//! `SearchService` is the single failure boundary of a search: it normalizes
//! the raw request, builds the predicate and sort spec, runs the count and
//! page queries concurrently and assembles the paginated result.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{
    config::SearchConfig,
    error::{QuestError, Result},
    params::{normalize_types, PageBounds, ParamValidator},
    query::QueryBuilder,
    sort::SortSpecBuilder,
    store::QuestionStore,
    types::{AppliedFilters, Pagination, SearchData},
};

/// Message returned when the query is missing under the strict policy
pub const QUERY_REQUIRED_MESSAGE: &str = "Search query is required";

/// Raw, untrusted search parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    /// Comma-joined and/or repeated type names
    #[serde(default)]
    pub types: Vec<String>,
}

impl SearchRequest {
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn with_page<S: Into<String>>(mut self, page: S) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_limit<S: Into<String>>(mut self, limit: S) -> Self {
        self.limit = Some(limit.into());
        self
    }

    pub fn with_sort<S: Into<String>>(mut self, sort: S, order: S) -> Self {
        self.sort = Some(sort.into());
        self.order = Some(order.into());
        self
    }

    pub fn with_types<S: Into<String>>(mut self, types: S) -> Self {
        self.types.push(types.into());
        self
    }
}

/// Policies and bounds applied by [`SearchService`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    pub bounds: PageBounds,
    /// Reject blank queries instead of listing everything
    pub require_query: bool,
    /// Reject pages beyond the last page instead of returning an empty page
    pub reject_page_overflow: bool,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            bounds: PageBounds::default(),
            require_query: true,
            reject_page_overflow: true,
        }
    }
}

impl From<&SearchConfig> for SearchPolicy {
    fn from(config: &SearchConfig) -> Self {
        Self {
            bounds: PageBounds {
                max_limit: config.max_limit,
                max_page: config.max_page,
                default_limit: config.default_limit,
            },
            require_query: config.require_query,
            reject_page_overflow: config.reject_page_overflow,
        }
    }
}

/// Runs searches against a [`QuestionStore`]
#[derive(Clone)]
pub struct SearchService {
    store: Arc<dyn QuestionStore>,
    policy: SearchPolicy,
    validator: ParamValidator,
}

impl SearchService {
    pub fn new(store: Arc<dyn QuestionStore>, policy: SearchPolicy) -> Self {
        Self {
            store,
            policy,
            validator: ParamValidator::new(policy.bounds),
        }
    }

    pub fn store(&self) -> &Arc<dyn QuestionStore> {
        &self.store
    }

    pub fn policy(&self) -> SearchPolicy {
        self.policy
    }

    /// Execute a search
    ///
    /// # Errors
    ///
    /// * `QuestError::Validation` - blank query while queries are required
    /// * `QuestError::OutOfRange` - page beyond the last page while overflow is rejected
    /// * `QuestError::Backend` - the store failed
    #[instrument(skip(self, request), fields(query = request.query.as_deref().unwrap_or("")))]
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchData> {
        let term = request.query.as_deref().unwrap_or("").trim();
        if self.policy.require_query && term.is_empty() {
            return Err(QuestError::validation(QUERY_REQUIRED_MESSAGE));
        }

        let types = normalize_types(&request.types);
        let (page, limit) = self
            .validator
            .validate(request.page.as_deref(), request.limit.as_deref());
        let (sort_field, sort_order) = self
            .validator
            .validate_sort(request.sort.as_deref(), request.order.as_deref());

        let filter = QueryBuilder::build(term, &types);
        let sort = SortSpecBuilder::build(sort_field, sort_order);
        let skip = u64::from(page - 1) * u64::from(limit);

        debug!(
            page,
            limit,
            sort = %sort_field,
            order = %sort_order,
            types = ?types,
            "Running search"
        );

        let (total, questions) = tokio::try_join!(
            self.store.count(&filter),
            self.store.find(&filter, &sort, skip, limit)
        )?;

        let pagination = Pagination::new(page, limit, total);
        if self.policy.reject_page_overflow
            && pagination.total_pages > 0
            && u64::from(page) > pagination.total_pages
        {
            return Err(QuestError::out_of_range(page, pagination.total_pages));
        }

        info!(
            "Search matched {} questions, returning page {} of {}",
            total, page, pagination.total_pages
        );

        Ok(SearchData {
            questions,
            pagination,
            applied_filters: AppliedFilters {
                types,
                sort: sort_field,
                order: sort_order,
            },
        })
    }
}
