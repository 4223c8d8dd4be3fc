//! QuestSearch Core Library
//!
//! Core functionality for the QuestSearch question search service.
//! This library provides the data model, search predicate construction,
//! parameter validation, sort specification and the search service that
//! ties them to a pluggable question store.

pub mod config;
pub mod error;
pub mod logging;
pub mod params;
pub mod query;
pub mod service;
pub mod sort;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::{ClientConfig, Environment, QuestConfig, SearchConfig};
pub use error::{ErrorCategory, QuestError, Result};
pub use logging::{init_logger, LogFormat, LoggerConfig};
pub use params::{normalize_types, parse_leading_int, PageBounds, ParamValidator};
pub use query::{FilterPredicate, QueryBuilder, TitlePattern};
pub use service::{SearchPolicy, SearchRequest, SearchService};
pub use sort::{SortKey, SortSpec, SortSpecBuilder};
pub use store::{MemoryStore, QuestionStore};
pub use types::{
    ActiveContent, AnagramType, ApiResponse, AppliedFilters, Block, Pagination, Question,
    QuestionOption, QuestionType, QuestionView, SearchData, SortField, SortOrder,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version info as a formatted string
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _: Result<()> = Ok(());
        let _ = SearchRequest::new("cat");
        let _ = SortSpecBuilder::build(SortField::Title, SortOrder::Asc);
    }

    #[test]
    fn test_version_info() {
        let info = version_info();
        assert!(info.contains("questsearch-core"));
        assert!(info.contains(VERSION));
    }
}
