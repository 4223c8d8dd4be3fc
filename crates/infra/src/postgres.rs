//! Postgres question store
//!
//! Expects a `questions` table of the following shape; the store never
//! creates or migrates it.
//!
//! ```sql
//! CREATE TABLE questions (
//!     id           UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     title        TEXT NOT NULL,
//!     type         TEXT NOT NULL,
//!     anagram_type TEXT,
//!     blocks       JSONB NOT NULL DEFAULT '[]',
//!     options      JSONB NOT NULL DEFAULT '[]',
//!     solution     TEXT,
//!     created_at   TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```

use async_trait::async_trait;
use questsearch_core::{
    config::DatabaseConfig, AnagramType, Block, FilterPredicate, QuestError, QuestionOption,
    QuestionStore, QuestionType, QuestionView, Result, SortField, SortOrder, SortSpec,
};
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    types::Json,
    PgPool, Postgres, QueryBuilder, Row,
};
use tracing::{debug, info};

const PROJECTION: &str = "SELECT title, type, anagram_type, blocks, options, solution FROM questions";

/// Question store backed by a Postgres table
#[derive(Clone)]
pub struct PgQuestionStore {
    pool: PgPool,
}

impl PgQuestionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool using the database settings
    ///
    /// # Errors
    ///
    /// Returns `QuestError::Backend` if the database is unreachable
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url)
            .await
            .map_err(|e| QuestError::backend(format!("Failed to connect to Postgres: {}", e)))?;

        info!(
            "Connected to Postgres question store (max {} connections)",
            config.max_connections
        );
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn column(field: SortField) -> &'static str {
    match field {
        SortField::Title => "title",
        SortField::Type => "type",
        SortField::CreatedAt => "created_at",
        SortField::AnagramType => "anagram_type",
    }
}

/// Append the `WHERE` clause for `filter`
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &FilterPredicate) {
    let mut separator = " WHERE ";
    if let Some(pattern) = &filter.title {
        builder
            .push(separator)
            .push("title ILIKE ")
            .push_bind(pattern.like_pattern())
            .push(" ESCAPE '\\'");
        separator = " AND ";
    }
    if !filter.types.is_empty() {
        let types: Vec<String> = filter.types.iter().cloned().collect();
        builder
            .push(separator)
            .push("type = ANY(")
            .push_bind(types)
            .push(")");
    }
}

/// Append `ORDER BY` for `sort`; nulls sort first ascending and last
/// descending, with `id` as the final key
fn push_order(builder: &mut QueryBuilder<'_, Postgres>, sort: &SortSpec) {
    builder.push(" ORDER BY ");
    for key in sort.keys() {
        let direction = match key.order {
            SortOrder::Asc => "ASC NULLS FIRST",
            SortOrder::Desc => "DESC NULLS LAST",
        };
        builder.push(column(key.field)).push(" ").push(direction).push(", ");
    }
    builder.push("id ASC");
}

fn count_query(filter: &FilterPredicate) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM questions");
    push_filter(&mut builder, filter);
    builder
}

fn find_query(
    filter: &FilterPredicate,
    sort: &SortSpec,
    skip: u64,
    limit: u32,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(PROJECTION);
    push_filter(&mut builder, filter);
    push_order(&mut builder, sort);
    builder
        .push(" LIMIT ")
        .push_bind(i64::from(limit))
        .push(" OFFSET ")
        .push_bind(i64::try_from(skip).unwrap_or(i64::MAX));
    builder
}

fn row_error(column: &str, e: sqlx::Error) -> QuestError {
    QuestError::backend(format!("Failed to read column {}: {}", column, e))
}

fn view_from_row(row: &PgRow) -> Result<QuestionView> {
    let title: String = row.try_get("title").map_err(|e| row_error("title", e))?;
    let kind: String = row.try_get("type").map_err(|e| row_error("type", e))?;
    let anagram_type: Option<String> = row
        .try_get("anagram_type")
        .map_err(|e| row_error("anagram_type", e))?;
    let Json(blocks): Json<Vec<Block>> =
        row.try_get("blocks").map_err(|e| row_error("blocks", e))?;
    let Json(options): Json<Vec<QuestionOption>> =
        row.try_get("options").map_err(|e| row_error("options", e))?;
    let solution: Option<String> = row.try_get("solution").map_err(|e| row_error("solution", e))?;

    let kind: QuestionType = kind
        .parse()
        .map_err(|e| QuestError::backend(format!("Bad question row: {}", e)))?;
    let anagram_type = anagram_type
        .map(|t| t.parse::<AnagramType>())
        .transpose()
        .map_err(|e| QuestError::backend(format!("Bad question row: {}", e)))?;

    Ok(QuestionView {
        title,
        kind,
        anagram_type,
        blocks,
        options,
        solution,
    })
}

#[async_trait]
impl QuestionStore for PgQuestionStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn count(&self, filter: &FilterPredicate) -> Result<u64> {
        let mut query = count_query(filter);
        let row = query
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| QuestError::backend(format!("Failed to count questions: {}", e)))?;
        let count: i64 = row.try_get(0).map_err(|e| row_error("count", e))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn find(
        &self,
        filter: &FilterPredicate,
        sort: &SortSpec,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<QuestionView>> {
        let mut query = find_query(filter, sort, skip, limit);
        debug!("Querying questions: {}", query.sql());

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| QuestError::backend(format!("Failed to fetch questions: {}", e)))?;

        rows.iter().map(view_from_row).collect()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| QuestError::backend(format!("Postgres ping failed: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questsearch_core::{QueryBuilder as PredicateBuilder, SortSpecBuilder};

    #[test]
    fn test_count_query_without_filter() {
        let filter = FilterPredicate::match_all();
        assert_eq!(count_query(&filter).sql(), "SELECT COUNT(*) FROM questions");
    }

    #[test]
    fn test_count_query_with_title_and_types() {
        let filter = PredicateBuilder::build("cat", &["MCQ", "ANAGRAM"]);
        assert_eq!(
            count_query(&filter).sql(),
            "SELECT COUNT(*) FROM questions WHERE title ILIKE $1 ESCAPE '\\' AND type = ANY($2)"
        );
    }

    #[test]
    fn test_types_only_filter() {
        let filter = PredicateBuilder::build("", &["MCQ"]);
        assert_eq!(
            count_query(&filter).sql(),
            "SELECT COUNT(*) FROM questions WHERE type = ANY($1)"
        );
    }

    #[test]
    fn test_find_query_order_and_paging() {
        let filter = PredicateBuilder::build("cat", &[] as &[String]);
        let sort = SortSpecBuilder::build(SortField::CreatedAt, SortOrder::Desc);
        let query = find_query(&filter, &sort, 20, 10);

        assert_eq!(
            query.sql(),
            "SELECT title, type, anagram_type, blocks, options, solution FROM questions \
             WHERE title ILIKE $1 ESCAPE '\\' \
             ORDER BY title ASC NULLS FIRST, type ASC NULLS FIRST, \
             created_at DESC NULLS LAST, anagram_type ASC NULLS FIRST, id ASC \
             LIMIT $2 OFFSET $3"
        );
    }

    #[test]
    fn test_sort_columns() {
        assert_eq!(column(SortField::CreatedAt), "created_at");
        assert_eq!(column(SortField::AnagramType), "anagram_type");
    }
}
