//! In-memory question store

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::QuestionStore;
use crate::{
    error::{QuestError, Result},
    query::FilterPredicate,
    sort::SortSpec,
    types::{Question, QuestionView},
};

/// Question store backed by a vector, optionally seeded from a JSON file
#[derive(Debug, Default)]
pub struct MemoryStore {
    questions: RwLock<Vec<Question>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions: RwLock::new(questions),
            offline: AtomicBool::new(false),
        }
    }

    /// Load a JSON array of questions
    ///
    /// Missing `id` and `createdAt` fields are assigned on load.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::Io` if the file cannot be read and
    /// `QuestError::Json` if it is not a valid question array
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let questions: Vec<Question> = serde_json::from_str(&content)?;
        info!(
            "Seeded in-memory store with {} questions from {}",
            questions.len(),
            path.display()
        );
        Ok(Self::with_questions(questions))
    }

    pub async fn insert(&self, question: Question) {
        self.questions.write().await.push(question);
    }

    pub async fn len(&self) -> usize {
        self.questions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.questions.read().await.is_empty()
    }

    /// Simulate an outage; every operation fails while offline
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(QuestError::backend("in-memory store is offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn count(&self, filter: &FilterPredicate) -> Result<u64> {
        self.ensure_online()?;
        let questions = self.questions.read().await;
        Ok(questions.iter().filter(|q| filter.matches(q)).count() as u64)
    }

    async fn find(
        &self,
        filter: &FilterPredicate,
        sort: &SortSpec,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<QuestionView>> {
        self.ensure_online()?;
        let questions = self.questions.read().await;

        let mut matching: Vec<&Question> = questions.iter().filter(|q| filter.matches(q)).collect();
        matching.sort_by(|a, b| sort.compare(a, b));

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let page: Vec<QuestionView> = matching
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .map(Question::view)
            .collect();

        debug!("In-memory find returned {} questions", page.len());
        Ok(page)
    }

    async fn ping(&self) -> Result<()> {
        self.ensure_online()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryBuilder;
    use crate::sort::SortSpecBuilder;
    use crate::types::{QuestionType, SortField, SortOrder};
    use chrono::{Duration, Utc};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn seeded() -> MemoryStore {
        let base = Utc::now();
        let questions = (0..5)
            .map(|i| {
                Question::new(format!("question {}", i), QuestionType::Mcq)
                    .with_created_at(base + Duration::seconds(i))
            })
            .collect();
        MemoryStore::with_questions(questions)
    }

    #[tokio::test]
    async fn test_count_and_find_page() {
        let store = seeded();
        let filter = QueryBuilder::build("question", &[] as &[String]);
        let sort = SortSpecBuilder::build(SortField::Title, SortOrder::Desc);

        assert_eq!(store.count(&filter).await.unwrap(), 5);

        let page = store.find(&filter, &sort, 1, 2).await.unwrap();
        let titles: Vec<_> = page.iter().map(|q| q.title.as_str()).collect();
        assert_eq!(titles, vec!["question 3", "question 2"]);
    }

    #[tokio::test]
    async fn test_skip_past_end_is_empty() {
        let store = seeded();
        let filter = FilterPredicate::match_all();
        let page = store.find(&filter, &SortSpec::default(), 50, 10).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let store = seeded();
        store.set_offline(true);
        assert!(store.ping().await.is_err());
        let err = store.count(&FilterPredicate::match_all()).await.unwrap_err();
        assert!(matches!(err, QuestError::Backend { .. }));

        store.set_offline(false);
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"title": "Cat nap", "type": "READ_ALONG"}},
                {{"title": "Pick a cat", "type": "MCQ",
                  "options": [{{"text": "tabby", "isCorrectAnswer": true}}]}}]"#
        )
        .unwrap();

        let store = MemoryStore::from_json_file(file.path()).unwrap();
        assert_eq!(store.len().await, 2);

        let filter = QueryBuilder::build("cat", &["MCQ"]);
        assert_eq!(store.count(&filter).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_from_json_file_rejects_garbage() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = MemoryStore::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, QuestError::Json(_)));
    }
}
