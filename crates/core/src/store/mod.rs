//! Question storage abstraction
//!
//! The search service talks to its document store only through
//! [`QuestionStore`]. The in-memory implementation lives here; the Postgres
//! implementation lives in the infra crate.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::{error::Result, query::FilterPredicate, sort::SortSpec, types::QuestionView};

/// Read access to the question catalogue
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Short name of the backend, reported by health checks
    fn backend_name(&self) -> &'static str;

    /// Count the questions matching `filter`
    async fn count(&self, filter: &FilterPredicate) -> Result<u64>;

    /// Fetch one page of matching questions, projected for clients
    ///
    /// Results are ordered by `sort`, then `skip` rows are dropped and at
    /// most `limit` rows are returned.
    async fn find(
        &self,
        filter: &FilterPredicate,
        sort: &SortSpec,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<QuestionView>>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<()>;
}
