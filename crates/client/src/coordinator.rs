//! Client query coordinator
//!
//! Turns a stream of search intents into at most one network request at a
//! time. Calls to [`QueryCoordinator::search`] are debounced; a pending or
//! in-flight request is superseded by the next one. Every request carries a
//! generation number and only the latest generation may publish state.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use questsearch_core::{ClientConfig, SearchData};
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::{
    create_shared_cache, spawn_sweeper, ResponseCacheConfig, SearchCacheKey, SharedResponseCache,
};
use crate::params::SearchParams;
use crate::state::QueryState;
use crate::transport::{FetchError, SearchTransport};

/// Coordinator timing options
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    /// Quiet period before a search is issued
    pub debounce: Duration,
    /// Age after which cached responses are refetched
    pub cache_ttl: Duration,
    /// Capacity of a cache created by the coordinator
    pub cache_capacity: u64,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            cache_ttl: Duration::from_secs(300),
            cache_capacity: 1000,
        }
    }
}

impl From<&ClientConfig> for CoordinatorOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            debounce: config.debounce(),
            cache_ttl: config.cache_ttl(),
            cache_capacity: config.cache_capacity,
        }
    }
}

#[derive(Default)]
struct Control {
    generation: u64,
    params: Option<SearchParams>,
    pending: Option<JoinHandle<()>>,
    in_flight: Option<(u64, CancellationToken)>,
}

struct Inner<T> {
    transport: T,
    cache: SharedResponseCache,
    control: Mutex<Control>,
    state: watch::Sender<QueryState>,
}

impl<T: SearchTransport> Inner<T> {
    /// Apply `update` if `generation` is still the latest
    fn publish_if_current<F>(&self, generation: u64, update: F) -> bool
    where
        F: FnOnce(&mut QueryState),
    {
        let control = self.control.lock();
        if control.generation != generation {
            return false;
        }
        self.state.send_modify(update);
        true
    }

    /// Cancel the in-flight request if `generation` is still the latest
    fn supersede_in_flight(&self, generation: u64) -> bool {
        let mut control = self.control.lock();
        if control.generation != generation {
            return false;
        }
        if let Some((previous, token)) = control.in_flight.take() {
            debug!("Cancelling request generation {}", previous);
            token.cancel();
        }
        true
    }

    async fn run(self: &Arc<Self>, generation: u64, params: SearchParams, bypass_cache: bool) {
        if !self.supersede_in_flight(generation) {
            return;
        }

        if params.is_blank_first_page() {
            self.publish_if_current(generation, |s| s.succeed_empty(generation));
            return;
        }

        let key = SearchCacheKey::from(&params);
        if bypass_cache {
            self.cache.invalidate(&key).await;
        } else if let Some(data) = self.cache.get_fresh(&key).await {
            debug!("Cache hit for {:?} page {}", params.query, params.page);
            self.publish_if_current(generation, |s| s.succeed(generation, &data));
            return;
        }

        let token = CancellationToken::new();
        {
            let mut control = self.control.lock();
            if control.generation != generation {
                return;
            }
            if let Some((previous, old)) = control.in_flight.replace((generation, token.clone())) {
                debug!("Cancelling request generation {}", previous);
                old.cancel();
            }
            self.state.send_modify(|s| s.loading(generation));
        }

        let result = self.transport.fetch(&params, token).await;

        {
            let mut control = self.control.lock();
            if matches!(control.in_flight, Some((g, _)) if g == generation) {
                control.in_flight = None;
            }
        }

        match result {
            Ok(data) => {
                self.cache.insert(key, data.clone()).await;
                if !self.publish_if_current(generation, |s| s.succeed(generation, &data)) {
                    debug!("Discarding stale response for generation {}", generation);
                }
            }
            Err(FetchError::Cancelled) => {
                debug!("Request generation {} cancelled", generation);
            }
            Err(e) => {
                let message = e.user_message();
                if self.publish_if_current(generation, |s| s.fail(generation, message)) {
                    warn!("Search failed: {}", e);
                }
            }
        }
    }
}

/// Debounced, cached and cancellable search driver
///
/// Must be created inside a tokio runtime; it owns a background cache
/// sweeper that stops when the coordinator is dropped.
///
/// # Examples
///
/// ```no_run
/// use questsearch_client::{CoordinatorOptions, HttpTransport, QueryCoordinator, SearchParams};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpTransport::new("http://localhost:3000", Duration::from_secs(5))?;
/// let coordinator = QueryCoordinator::new(transport, CoordinatorOptions::default());
///
/// coordinator.search(SearchParams::new("cat"));
/// let state = coordinator.settled().await;
/// println!("{} questions", state.questions.len());
/// # Ok(())
/// # }
/// ```
pub struct QueryCoordinator<T: SearchTransport> {
    inner: Arc<Inner<T>>,
    debounce: Duration,
    sweeper: JoinHandle<()>,
}

impl<T: SearchTransport> QueryCoordinator<T> {
    /// Create a coordinator with its own cache
    pub fn new(transport: T, options: CoordinatorOptions) -> Self {
        let cache = create_shared_cache(ResponseCacheConfig {
            max_capacity: options.cache_capacity,
            ttl: options.cache_ttl,
        });
        Self::with_cache(transport, cache, options)
    }

    /// Create a coordinator over a cache shared with other coordinators
    ///
    /// The cache's own TTL governs freshness.
    pub fn with_cache(transport: T, cache: SharedResponseCache, options: CoordinatorOptions) -> Self {
        let (state, _) = watch::channel(QueryState::default());
        let sweeper = spawn_sweeper(cache.clone());
        Self {
            inner: Arc::new(Inner {
                transport,
                cache,
                control: Mutex::new(Control::default()),
                state,
            }),
            debounce: options.debounce,
            sweeper,
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> QueryState {
        self.inner.state.borrow().clone()
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.inner.state.subscribe()
    }

    pub fn cache(&self) -> &SharedResponseCache {
        &self.inner.cache
    }

    /// Parameters of the latest request
    pub fn current_params(&self) -> Option<SearchParams> {
        self.inner.control.lock().params.clone()
    }

    /// Request a search; supersedes any pending or in-flight request
    pub fn search(&self, params: SearchParams) {
        self.schedule(params, self.debounce, false);
    }

    /// Evict the current parameters from the cache and fetch them again
    ///
    /// Does nothing before the first search.
    pub fn refetch(&self) {
        if let Some(params) = self.current_params() {
            self.schedule(params, Duration::ZERO, true);
        }
    }

    fn schedule(&self, params: SearchParams, delay: Duration, bypass_cache: bool) {
        let mut control = self.inner.control.lock();
        control.generation += 1;
        let generation = control.generation;
        control.params = Some(params.clone());
        if let Some(pending) = control.pending.take() {
            pending.abort();
        }

        let inner = Arc::clone(&self.inner);
        control.pending = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            {
                // No longer abortable: supersession goes through the token.
                let mut control = inner.control.lock();
                if control.generation != generation {
                    return;
                }
                control.pending = None;
            }
            inner.run(generation, params, bypass_cache).await;
        }));
    }

    /// Wait until the latest request reaches a terminal state
    ///
    /// Resolves immediately when no search has been requested.
    pub async fn settled(&self) -> QueryState {
        let mut rx = self.inner.state.subscribe();
        loop {
            let target = self.inner.control.lock().generation;
            {
                let state = rx.borrow_and_update();
                if target == 0 || (state.generation == target && state.status.is_terminal()) {
                    return state.clone();
                }
            }
            if rx.changed().await.is_err() {
                return self.state();
            }
        }
    }

    /// Run a search and wait for its outcome
    pub async fn search_and_wait(&self, params: SearchParams) -> QueryState {
        self.search(params);
        self.settled().await
    }

    /// Cached data for `params`, if fresh
    pub async fn cached(&self, params: &SearchParams) -> Option<SearchData> {
        self.inner.cache.get_fresh(&SearchCacheKey::from(params)).await
    }
}

impl<T: SearchTransport> Drop for QueryCoordinator<T> {
    fn drop(&mut self) {
        self.sweeper.abort();
        let mut control = self.inner.control.lock();
        if let Some(pending) = control.pending.take() {
            pending.abort();
        }
        if let Some((_, token)) = control.in_flight.take() {
            token.cancel();
        }
    }
}
