//! End-to-end tests: the query coordinator talking to a live server

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use questsearch_client::{
    CoordinatorOptions, HttpTransport, QueryCoordinator, QueryStatus, SearchParams,
};
use questsearch_core::{
    Environment, MemoryStore, Question, QuestionType, SearchPolicy, SortField, SortOrder,
};
use questsearch_serve::{AppState, ServerBuilder};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

struct TestServer {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let base = Utc::now() - chrono::Duration::days(1);
        let mut questions: Vec<Question> = (0..15)
            .map(|i| {
                Question::new(format!("Cat question {:02}", i), QuestionType::Mcq)
                    .with_created_at(base + chrono::Duration::minutes(i))
            })
            .collect();
        questions.push(Question::new("Dog question", QuestionType::ReadAlong));

        let store = Arc::new(MemoryStore::with_questions(questions));
        let state = AppState::new(store, SearchPolicy::default(), Environment::Development);
        let server = ServerBuilder::new().host("127.0.0.1").port(0).build(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            server
                .serve(listener, async {
                    let _ = rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            base_url,
            shutdown: Some(tx),
            handle,
        }
    }

    fn coordinator(&self) -> QueryCoordinator<HttpTransport> {
        let transport = HttpTransport::new(&self.base_url, Duration::from_secs(5)).unwrap();
        QueryCoordinator::new(
            transport,
            CoordinatorOptions {
                debounce: Duration::ZERO,
                ..CoordinatorOptions::default()
            },
        )
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap();
    }
}

#[tokio::test]
async fn test_first_page_over_http() {
    let server = TestServer::start().await;
    let coordinator = server.coordinator();

    let state = coordinator.search_and_wait(SearchParams::new("cat")).await;
    assert_eq!(state.status, QueryStatus::Success);
    assert_eq!(state.questions.len(), 10);
    assert_eq!(state.total_pages, 2);
    assert_eq!(state.total_items, 15);
    assert!(!state.loading);
    // Title stays the leading key; createdAt only sets its own direction.
    assert_eq!(state.questions[0].title, "Cat question 00");

    let state = coordinator
        .search_and_wait(
            SearchParams::new("cat")
                .with_page(2)
                .with_sort(SortField::Title, SortOrder::Asc),
        )
        .await;
    assert_eq!(state.questions.len(), 5);
    assert_eq!(state.questions[0].title, "Cat question 10");

    server.stop().await;
}

#[tokio::test]
async fn test_server_errors_surface_as_messages() {
    let server = TestServer::start().await;
    let coordinator = server.coordinator();

    let state = coordinator
        .search_and_wait(SearchParams::new("cat").with_page(3))
        .await;
    assert_eq!(state.status, QueryStatus::Failed);
    assert_eq!(
        state.error.as_deref(),
        Some("Page number exceeds total pages. Maximum page is 2")
    );
    assert!(state.questions.is_empty());
    assert_eq!(state.total_pages, 0);

    let state = coordinator
        .search_and_wait(SearchParams::new("dog").with_types(vec!["MCQ".to_string()]))
        .await;
    assert_eq!(state.status, QueryStatus::Success);
    assert_eq!(state.total_items, 0);

    server.stop().await;
}

#[tokio::test]
async fn test_repeat_search_is_served_from_cache() {
    let server = TestServer::start().await;
    let coordinator = server.coordinator();
    let params = SearchParams::new("question");

    let first = coordinator.search_and_wait(params.clone()).await;
    assert_eq!(first.total_items, 16);
    assert!(coordinator.cached(&params).await.is_some());

    server.stop().await;

    // The server is gone; a fresh cache entry still answers.
    let second = coordinator.search_and_wait(params).await;
    assert_eq!(second.status, QueryStatus::Success);
    assert_eq!(second.questions, first.questions);
}
