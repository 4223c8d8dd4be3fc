//! QuestSearch Infrastructure Library
//!
//! Store backends for the QuestSearch service and the factory that picks one
//! from configuration.

use std::sync::Arc;

use questsearch_core::{config::DatabaseConfig, MemoryStore, QuestionStore, Result};

pub mod postgres;

pub use postgres::PgQuestionStore;

/// Infrastructure version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Open the store named by `config.url`
///
/// `memory://` yields an in-memory store, seeded from `config.seed_path` when
/// set. Anything else is treated as a Postgres connection string.
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn QuestionStore>> {
    if config.is_memory() {
        let store = match &config.seed_path {
            Some(path) => MemoryStore::from_json_file(path)?,
            None => MemoryStore::new(),
        };
        tracing::info!("Using in-memory question store ({} questions)", store.len().await);
        return Ok(Arc::new(store));
    }

    let store = PgQuestionStore::connect(config).await?;
    Ok(Arc::new(store))
}
