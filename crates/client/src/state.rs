//! Published coordinator state

use questsearch_core::{QuestionView, SearchData};
use serde::Serialize;

/// Lifecycle of the latest request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

impl QueryStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

/// Snapshot of what a view renders
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    pub questions: Vec<QuestionView>,
    pub total_pages: u64,
    pub total_items: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub status: QueryStatus,
    /// Generation of the request this snapshot belongs to
    pub generation: u64,
}

impl QueryState {
    pub(crate) fn loading(&mut self, generation: u64) {
        self.loading = true;
        self.error = None;
        self.status = QueryStatus::Loading;
        self.generation = generation;
    }

    pub(crate) fn succeed(&mut self, generation: u64, data: &SearchData) {
        self.questions = data.questions.clone();
        self.total_pages = data.pagination.total_pages;
        self.total_items = data.pagination.total_items;
        self.loading = false;
        self.error = None;
        self.status = QueryStatus::Success;
        self.generation = generation;
    }

    pub(crate) fn succeed_empty(&mut self, generation: u64) {
        self.questions.clear();
        self.total_pages = 0;
        self.total_items = 0;
        self.loading = false;
        self.error = None;
        self.status = QueryStatus::Success;
        self.generation = generation;
    }

    pub(crate) fn fail(&mut self, generation: u64, message: String) {
        self.questions.clear();
        self.total_pages = 0;
        self.total_items = 0;
        self.loading = false;
        self.error = Some(message);
        self.status = QueryStatus::Failed;
        self.generation = generation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_clears_results() {
        let mut state = QueryState::default();
        let mut data = SearchData::empty(10);
        data.pagination.total_pages = 3;
        state.succeed(1, &data);
        assert_eq!(state.total_pages, 3);
        assert!(state.status.is_terminal());

        state.fail(2, "boom".to_string());
        assert_eq!(state.total_pages, 0);
        assert!(state.questions.is_empty());
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert_eq!(state.generation, 2);
    }

    #[test]
    fn test_loading_keeps_previous_results() {
        let mut state = QueryState::default();
        let mut data = SearchData::empty(10);
        data.pagination.total_pages = 2;
        state.succeed(1, &data);

        state.loading(2);
        assert!(state.loading);
        assert_eq!(state.total_pages, 2);
        assert!(!state.status.is_terminal());
    }
}
